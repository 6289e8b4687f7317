//! HTTP transport module
//!
//! Provides the HTTP client and the page source built on it.
//!
//! # Features
//!
//! - **Retries**: Transient failures are re-sent on a constant, linear or exponential curve
//! - **Rate Limiting**: Token bucket pacing using governor
//! - **Page Source**: JSON listing endpoints as a `PageSource`

mod client;
mod rate_limit;
mod retry;
mod source;

pub use client::{HttpClient, HttpClientConfig, RequestParts};
pub use rate_limit::RateLimiterConfig;
pub use retry::{Backoff, RetryPolicy};
pub use source::{HttpPageSource, ListEndpoint};
