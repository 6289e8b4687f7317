//! Client-side request pacing
//!
//! A governor token bucket shared by every page request of one client.
//! Each attempt takes a token, so retries are paced too.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Token bucket settings from the catalog's `http.rate_limit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimiterConfig {
    /// Sustained page requests per second
    pub requests_per_second: u32,
    /// Requests allowed back to back before pacing kicks in, the rate when 0
    #[serde(default)]
    pub burst_size: u32,
}

impl RateLimiterConfig {
    /// Create a rate limit
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    fn quota(&self) -> Quota {
        let rate = NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(rate);
        Quota::per_second(rate).allow_burst(burst)
    }
}

/// Holds page requests back until the bucket has a token
pub(crate) struct RequestPacer(DefaultDirectRateLimiter);

impl RequestPacer {
    pub(crate) fn new(config: &RateLimiterConfig) -> Self {
        Self(RateLimiter::direct(config.quota()))
    }

    pub(crate) async fn wait(&self) {
        self.0.until_ready().await;
    }
}
