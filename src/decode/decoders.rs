//! Decoder implementations

use super::types::{PageDecoder, ResponseShape};
use crate::error::{Error, Result};
use crate::pagination::Page;
use serde_json::Value;

// ============================================================================
// JSON Page Decoder
// ============================================================================

/// JSON decoder driven by a [`ResponseShape`]
#[derive(Debug, Clone, Default)]
pub struct JsonPageDecoder {
    shape: ResponseShape,
}

impl JsonPageDecoder {
    /// Create a decoder for the given response shape
    pub fn new(shape: ResponseShape) -> Self {
        Self { shape }
    }

    /// Response shape
    pub fn shape(&self) -> &ResponseShape {
        &self.shape
    }

    /// Extract items from a JSON value
    fn extract_items(&self, value: &Value) -> Result<Vec<Value>> {
        match &self.shape.items_path {
            Some(path) => {
                // Simple paths are walked by hand; wildcards go to jsonpath-rust
                if path.contains('*') && !path.contains("[-") {
                    extract_with_jsonpath(value, path)
                } else {
                    match extract_path(value, path) {
                        Some(Value::Array(arr)) => Ok(arr),
                        Some(Value::Null) | None => Ok(vec![]),
                        Some(other) => Err(Error::decode(format!(
                            "Expected an array at '{path}', found {}",
                            type_name(&other)
                        ))),
                    }
                }
            }
            None => match value {
                Value::Array(arr) => Ok(arr.clone()),
                other => Err(Error::decode(format!(
                    "Expected the response body to be an array, found {}",
                    type_name(other)
                ))),
            },
        }
    }
}

impl PageDecoder for JsonPageDecoder {
    fn decode(&self, body: &str) -> Result<Page<Value>> {
        if body.trim().is_empty() {
            return Err(Error::decode("Empty response body"));
        }
        let value: Value = serde_json::from_str(body)?;
        self.decode_value(&value)
    }

    fn decode_value(&self, value: &Value) -> Result<Page<Value>> {
        let items = self.extract_items(value)?;
        let next_cursor = extract_scalar(value, &self.shape.cursor_path);
        Ok(Page::new(items, next_cursor))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract a value using simple dot-notation path
///
/// Supports `a.b.c`, an optional `$.` prefix, and array indexing such as
/// `items[0]` or `items[-1]`.
pub fn extract_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.clone());
    }

    let mut current = value;
    for part in path.split('.') {
        // Handle array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                arr.len() as i64 + index
            } else {
                index
            };
            current = arr.get(usize::try_from(idx).ok()?)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

/// Extract a scalar at `path` as a string
///
/// Strings come back as-is, numbers and booleans are formatted; nulls,
/// arrays and objects give `None`.
pub fn extract_scalar(value: &Value, path: &str) -> Option<String> {
    match extract_path(value, path)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath: {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
