//! Shared vocabulary types
//!
//! Parameter maps, the wire method of a listing operation and cursor
//! normalisation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// String-to-string map used for headers and parameters
pub type StringMap = HashMap<String, String>;

/// Fixed filter parameters sent with every page of one listing call
pub type QueryParams = StringMap;

/// HTTP method used by a listing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl Method {
    /// Method name as sent on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

/// Collapses an empty cursor to `None`
///
/// Listing APIs disagree on how "no more pages" is spelled: some omit the
/// token, some send `null`, some send `""`.
pub trait NonEmpty {
    /// The string, unless it is empty
    fn non_empty(self) -> Option<String>;
}

impl NonEmpty for Option<String> {
    fn non_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl NonEmpty for String {
    fn non_empty(self) -> Option<String> {
        Some(self).non_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let post: reqwest::Method = Method::POST.into();
        assert_eq!(reqwest::Method::POST, post);
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::GET.as_str(), "GET");
        assert_eq!(Method::POST.as_str(), "POST");
    }

    #[test]
    fn test_method_default() {
        assert_eq!(Method::default(), Method::GET);
    }

    #[test]
    fn test_method_serde() {
        let method: Method = serde_json::from_str("\"POST\"").unwrap();
        assert_eq!(method, Method::POST);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(
            Some("token".to_string()).non_empty(),
            Some("token".to_string())
        );
        assert_eq!(Some(String::new()).non_empty(), None);
        assert_eq!(None::<String>.non_empty(), None);
        assert_eq!(String::new().non_empty(), None);
    }
}
