//! Catalog types
//!
//! Declarative listing-operation definitions for YAML parsing.

use crate::decode::ResponseShape;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, ListEndpoint, RateLimiterConfig, RetryPolicy};
use crate::pagination::{ContinueRule, FetchOptions};
use crate::types::{Method, StringMap};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Catalog Definition
// ============================================================================

/// Top-level catalog of listing operations for one service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogDefinition {
    /// Service name
    pub name: String,
    /// Catalog version
    #[serde(default = "default_version")]
    pub version: String,
    /// Base URL for all requests
    pub base_url: String,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Listing operations
    pub operations: Vec<OperationDefinition>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl CatalogDefinition {
    /// Look up an operation by name
    pub fn find(&self, name: &str) -> Result<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| op.name == name)
            .ok_or_else(|| Error::OperationNotFound {
                name: name.to_string(),
            })
    }

    /// Operation names in catalog order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }

    /// HTTP client configuration for this catalog
    pub fn client_config(&self) -> HttpClientConfig {
        let defaults = HttpClientConfig::default();
        HttpClientConfig {
            base_url: Some(self.base_url.clone()),
            timeout: Duration::from_secs(self.http.timeout_secs),
            retry: self.http.retry.clone(),
            rate_limit: self.http.rate_limit.clone(),
            default_headers: self.headers.clone(),
            user_agent: self.http.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// The catalog's `http` block
///
/// Retry keys (`max_retries`, `backoff`, `initial_backoff_ms`,
/// `max_backoff_ms`) sit directly in the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Retry policy for each page request
    #[serde(flatten)]
    pub retry: RetryPolicy,
    /// Token bucket rate limit, none when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent, `pagewalk/<version>` when absent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            retry: RetryPolicy::default(),
            rate_limit: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ============================================================================
// Operation Definition
// ============================================================================

/// One paginated listing operation
///
/// Only the transport description varies between operations; the loop
/// itself is always [`PagedFetcher`](crate::pagination::PagedFetcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// Operation name (e.g. `ListAttacks`)
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// URL path
    pub path: String,
    /// Request parameter carrying the cursor
    pub cursor_param: String,
    /// Response path of the next cursor, defaults to `cursor_param`
    #[serde(default)]
    pub cursor_path: Option<String>,
    /// Request parameter carrying the page size
    #[serde(default)]
    pub page_size_param: Option<String>,
    /// Response path of the items array, the body itself when absent
    #[serde(default)]
    pub items_path: Option<String>,
    /// Largest page the server accepts
    pub server_page_cap: u32,
    /// Loop rule while a target count is set
    #[serde(default)]
    pub continue_rule: ContinueRule,
    /// Default filter parameters
    #[serde(default)]
    pub params: StringMap,
    /// Extra headers for this operation
    #[serde(default)]
    pub headers: StringMap,
}

impl OperationDefinition {
    /// Response path of the next cursor
    pub fn cursor_path(&self) -> &str {
        self.cursor_path.as_deref().unwrap_or(&self.cursor_param)
    }

    /// Where items and the next cursor live in the response
    pub fn response_shape(&self) -> ResponseShape {
        ResponseShape {
            items_path: self.items_path.clone(),
            cursor_path: self.cursor_path().to_string(),
        }
    }

    /// Transport description for the HTTP page source
    pub fn endpoint(&self) -> ListEndpoint {
        let mut endpoint =
            ListEndpoint::get(&self.path, &self.cursor_param, self.response_shape())
                .with_method(self.method);
        if let Some(param) = &self.page_size_param {
            endpoint = endpoint.with_page_size_param(param);
        }
        for (key, value) in &self.headers {
            endpoint = endpoint.with_header(key, value);
        }
        endpoint
    }

    /// Fetch options carrying this operation's page cap and continue rule
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.server_page_cap).with_continue_rule(self.continue_rule)
    }

    /// Default params overlaid with `overrides`
    pub fn merged_params(&self, overrides: &StringMap) -> StringMap {
        let mut params = self.params.clone();
        params.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}
