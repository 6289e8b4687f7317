//! HTTP client underneath every page source
//!
//! Sends one page request, pacing it through the optional rate limit and
//! re-sending it while the failure is transient and the retry policy
//! allows. This is the only place retries happen.

use super::rate_limit::{RateLimiterConfig, RequestPacer};
use super::retry::RetryPolicy;
use crate::error::{Error, Result};
use crate::types::StringMap;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Settings shared by every request of one client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Prefix for relative request paths
    pub base_url: Option<String>,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// When and how long to wait before re-sending
    pub retry: RetryPolicy,
    /// Token bucket, unpaced when absent
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub default_headers: StringMap,
    /// User agent
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: None,
            default_headers: StringMap::new(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

/// What varies between the requests of one listing walk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    /// Query string pairs
    pub query: Vec<(String, String)>,
    /// Per-request headers, applied after the defaults
    pub headers: StringMap,
    /// JSON body
    pub body: Option<Value>,
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    pacer: Option<RequestPacer>,
}

impl HttpClient {
    /// Create a client
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let pacer = config.rate_limit.as_ref().map(RequestPacer::new);

        Ok(Self {
            client,
            config,
            pacer,
        })
    }

    /// Send a request, re-sending it while the failure is retryable
    ///
    /// Any 4xx or 5xx that is not retried comes back as
    /// [`Error::HttpStatus`] carrying the response body.
    pub async fn send(&self, method: Method, path: &str, parts: &RequestParts) -> Result<Response> {
        let url = self.url_for(path);
        let policy = &self.config.retry;
        let mut retries = 0;

        loop {
            if let Some(pacer) = &self.pacer {
                pacer.wait().await;
            }

            let error = match self.attempt(&method, &url, parts).await {
                Ok(response) => {
                    debug!("{method} {url} succeeded after {retries} retries");
                    return Ok(response);
                }
                Err(error) => error,
            };

            if retries >= policy.max_retries || !error.is_retryable() {
                return Err(error);
            }

            let delay = match &error {
                Error::Throttled {
                    retry_after: Some(wait),
                } => *wait,
                _ => policy.delay(retries),
            };
            retries += 1;
            warn!(
                "{method} {url}: {error}, retry {retries}/{} in {delay:?}",
                policy.max_retries
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One attempt, with error statuses turned into errors
    async fn attempt(&self, method: &Method, url: &str, parts: &RequestParts) -> Result<Response> {
        let mut request = self.client.request(method.clone(), url);
        for (key, value) in self.config.default_headers.iter().chain(&parts.headers) {
            request = request.header(key.as_str(), value.as_str());
        }
        if !parts.query.is_empty() {
            request = request.query(&parts.query);
        }
        if let Some(body) = &parts.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::Throttled {
                retry_after: retry_after(&response),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        Ok(response)
    }

    fn url_for(&self, path: &str) -> String {
        match &self.config.base_url {
            Some(base) if !path.starts_with("http://") && !path.starts_with("https://") => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
            _ => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("paced", &self.pacer.is_some())
            .finish_non_exhaustive()
    }
}

/// `Retry-After` in whole seconds
fn retry_after(response: &Response) -> Option<Duration> {
    let value = response.headers().get(reqwest::header::RETRY_AFTER)?;
    value.to_str().ok()?.trim().parse().ok().map(Duration::from_secs)
}
