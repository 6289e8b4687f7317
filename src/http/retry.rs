//! Retry policy for page requests
//!
//! A page request that fails transiently is re-sent up to `max_retries`
//! times. The wait before each re-send comes from the server's
//! `Retry-After` when it sends one, otherwise from the backoff curve.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shape of the delay curve between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// Same delay every time
    Constant,
    /// `initial * n` on the n-th retry
    Linear,
    /// `initial * 2^(n-1)` on the n-th retry
    #[default]
    Exponential,
}

/// Retry settings read from a catalog's `http` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RetryPolicy {
    /// Re-sends allowed after the first attempt of one page
    pub max_retries: u32,
    /// Delay curve
    pub backoff: Backoff,
    /// Delay before the first re-send
    pub initial_backoff_ms: u64,
    /// Ceiling on any single delay
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Backoff::Exponential,
            initial_backoff_ms: 100,
            max_backoff_ms: 20_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before re-send number `retry` (zero-based)
    pub fn delay(&self, retry: u32) -> Duration {
        let initial = self.initial_backoff_ms;
        let millis = match self.backoff {
            Backoff::Constant => initial,
            Backoff::Linear => initial.saturating_mul(u64::from(retry) + 1),
            Backoff::Exponential => initial.saturating_mul(1u64 << retry.min(32)),
        };
        Duration::from_millis(millis.min(self.max_backoff_ms))
    }
}
