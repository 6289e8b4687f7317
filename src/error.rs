//! Error types for pagewalk
//!
//! Every fallible call in the crate returns [`Result<T>`].
//!
//! The pagination engine never inspects error subtypes: anything a
//! `PageSource` returns is a transport error as far as the engine cares.
//! Only configuration errors are raised by the engine itself.

use std::time::Duration;
use thiserror::Error;

/// The main error type for pagewalk
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Catalog and option errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Catalog field '{field}' is required")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Catalog is not valid YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Operation '{name}' not found in catalog")]
    OperationNotFound { name: String },

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport errors
    // ============================================================================
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Throttled by server (HTTP 429)")]
    Throttled { retry_after: Option<Duration> },

    #[error("No response within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Response errors
    // ============================================================================
    #[error("Response is not JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Bad JSONPath: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode page: {message}")]
    Decode { message: String },

    #[error("Invalid select expression '{expression}': {message}")]
    Projection { expression: String, message: String },

    // ============================================================================
    // Walk errors
    // ============================================================================
    #[error("Fetch cancelled after {retrieved} items")]
    Cancelled { retrieved: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    /// Errors raised by closure sources built on other libraries
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Catalog or option problem without a specific field
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Required catalog field left empty
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Field present but out of range
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Non-retried error status with its body
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Wildcard path rejected by jsonpath-rust
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Response body not shaped like a page
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Unusable `--select` expression
    pub fn projection(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Projection {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// True when the caller's catalog or options are at fault
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingField { .. }
                | Error::InvalidValue { .. }
                | Error::YamlParse(_)
                | Error::OperationNotFound { .. }
                | Error::InvalidUrl(_)
        )
    }

    /// True when re-sending the same page request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Throttled { .. } | Error::Timeout { .. } => true,
            Error::Http(e) => e.is_connect(),
            Error::HttpStatus { status, .. } => {
                matches!(*status, 500 | 502 | 503 | 504 | 520..=524)
            }
            _ => false,
        }
    }
}

/// Result type alias for pagewalk
pub type Result<T> = std::result::Result<T, Error>;

/// Prefix an error with what was being done when it happened
pub trait ResultExt<T> {
    /// Add context built lazily
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", f(), e.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("no catalog given");
        assert_eq!(err.to_string(), "Configuration error: no catalog given");

        let err = Error::missing_field("ListAttacks.path");
        assert_eq!(err.to_string(), "Catalog field 'ListAttacks.path' is required");

        let err = Error::http_status(400, "ValidationException");
        assert_eq!(err.to_string(), "HTTP 400: ValidationException");

        let err = Error::Cancelled { retrieved: 40 };
        assert_eq!(err.to_string(), "Fetch cancelled after 40 items");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Throttled { retry_after: None }.is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());
        assert!(Error::http_status(522, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(403, "").is_retryable());
        assert!(!Error::decode("bad page").is_retryable());
        assert!(!Error::missing_field("ListAttacks.path").is_retryable());
    }

    #[test]
    fn test_is_config() {
        assert!(Error::config("bad").is_config());
        assert!(Error::invalid_value("server_page_cap", "must be positive").is_config());
        assert!(Error::OperationNotFound {
            name: "ListAttacks".to_string()
        }
        .is_config());
        assert!(!Error::http_status(500, "").is_config());
    }

    #[test]
    fn test_with_context() {
        let result: Result<()> = Err(Error::decode("truncated"));
        let err = result
            .with_context(|| "Reading /attacks response body".to_string())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Reading /attacks response body: Failed to decode page: truncated"
        );
    }

    #[test]
    fn test_anyhow_is_transparent() {
        let err: Error = anyhow::anyhow!("upstream said no").into();
        assert_eq!(err.to_string(), "upstream said no");
        assert!(!err.is_retryable());
    }
}
