//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use crate::pagination::Page;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where items and the continuation token live in a response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResponseShape {
    /// Path to the item array (e.g. `Attacks`, `$.data.items[*]`); `None`
    /// means the whole body is the item list
    #[serde(default)]
    pub items_path: Option<String>,
    /// Path to the next-page token (e.g. `NextToken`, `NextMarker`)
    pub cursor_path: String,
}

impl ResponseShape {
    /// Create a shape with an items path
    pub fn new(items_path: impl Into<String>, cursor_path: impl Into<String>) -> Self {
        Self {
            items_path: Some(items_path.into()),
            cursor_path: cursor_path.into(),
        }
    }

    /// Create a shape where the body itself is the item list
    pub fn root(cursor_path: impl Into<String>) -> Self {
        Self {
            items_path: None,
            cursor_path: cursor_path.into(),
        }
    }
}

impl Default for ResponseShape {
    fn default() -> Self {
        Self::new("items", "next_token")
    }
}

/// Trait for decoding one listing response into a page
pub trait PageDecoder: Send + Sync {
    /// Decode a raw response body
    fn decode(&self, body: &str) -> Result<Page<Value>>;

    /// Decode an already parsed response body
    fn decode_value(&self, value: &Value) -> Result<Page<Value>>;
}
