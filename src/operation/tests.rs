//! Tests for the operation catalog module

use super::*;
use crate::error::Error;
use crate::http::{Backoff, RateLimiterConfig, RetryPolicy};
use crate::pagination::ContinueRule;
use crate::types::{Method, StringMap};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::time::Duration;

const SHIELD: &str = r#"
name: shield
base_url: https://shield.example.com
headers:
  X-Api-Version: "2016-06-02"
http:
  timeout_secs: 10
  max_retries: 5
  backoff: linear
  initial_backoff_ms: 250
  rate_limit:
    requests_per_second: 4
    burst_size: 2
operations:
  - name: ListAttacks
    description: Attacks against protected resources
    path: /attacks
    cursor_param: NextToken
    page_size_param: MaxResults
    items_path: AttackSummaries
    server_page_cap: 100
    params:
      StartTime: "0"
  - name: ListPolicies
    method: POST
    path: /policies
    cursor_param: Marker
    cursor_path: NextMarker
    items_path: Policies
    server_page_cap: 1000
    continue_rule: non_negative
    headers:
      X-Amz-Target: Shield.ListPolicies
"#;

// ============================================================================
// Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_catalog() {
    let yaml = r#"
name: minimal
base_url: https://api.example.com
operations:
  - name: ListThings
    path: /things
    cursor_param: next_token
    server_page_cap: 50
"#;

    let def = load_catalog_from_str(yaml).unwrap();
    assert_eq!(def.name, "minimal");
    assert_eq!(def.version, "0.1.0");
    assert_eq!(def.http, HttpDefinition::default());

    let op = &def.operations[0];
    assert_eq!(op.method, Method::GET);
    assert_eq!(op.continue_rule, ContinueRule::Positive);
    assert_eq!(op.cursor_path(), "next_token");
    assert!(op.items_path.is_none());
    assert!(op.page_size_param.is_none());
}

#[test]
fn test_load_full_catalog() {
    let def = load_catalog_from_str(SHIELD).unwrap();
    assert_eq!(def.operation_names(), vec!["ListAttacks", "ListPolicies"]);
    assert_eq!(def.http.timeout_secs, 10);
    assert_eq!(def.http.retry.backoff, Backoff::Linear);
    assert_eq!(def.http.rate_limit, Some(RateLimiterConfig::new(4, 2)));

    let policies = def.find("ListPolicies").unwrap();
    assert_eq!(policies.method, Method::POST);
    assert_eq!(policies.cursor_path(), "NextMarker");
    assert_eq!(policies.continue_rule, ContinueRule::NonNegative);
}

#[test]
fn test_load_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHIELD.as_bytes()).unwrap();

    let def = load_catalog(file.path()).unwrap();
    assert_eq!(def.operations.len(), 2);
}

#[test]
fn test_load_catalog_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_catalog(dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("missing.yaml"));
}

#[test]
fn test_find_unknown_operation() {
    let def = load_catalog_from_str(SHIELD).unwrap();
    let err = def.find("ListProtections").unwrap_err();
    assert!(matches!(err, Error::OperationNotFound { name } if name == "ListProtections"));
}

// ============================================================================
// Validation Tests
// ============================================================================

fn catalog_with_operation(op: &str) -> String {
    format!("name: svc\nbase_url: https://api.example.com\noperations:\n{op}")
}

#[test]
fn test_reject_zero_page_cap() {
    let yaml = catalog_with_operation(
        "  - name: ListThings\n    path: /things\n    cursor_param: t\n    server_page_cap: 0\n",
    );
    let err = load_catalog_from_str(&yaml).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
}

#[test]
fn test_reject_duplicate_names() {
    let op = "  - name: ListThings\n    path: /things\n    cursor_param: t\n    server_page_cap: 5\n";
    let yaml = catalog_with_operation(&format!("{op}{op}"));
    let err = load_catalog_from_str(&yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate operation names"));
}

#[test]
fn test_reject_empty_path_and_cursor_param() {
    let yaml = catalog_with_operation(
        "  - name: ListThings\n    path: \"\"\n    cursor_param: t\n    server_page_cap: 5\n",
    );
    let err = load_catalog_from_str(&yaml).unwrap_err();
    assert!(matches!(err, Error::MissingField { field } if field == "ListThings.path"));

    let yaml = catalog_with_operation(
        "  - name: ListThings\n    path: /things\n    cursor_param: \"\"\n    server_page_cap: 5\n",
    );
    let err = load_catalog_from_str(&yaml).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingField { field } if field == "ListThings.cursor_param"
    ));
}

#[test]
fn test_reject_no_operations_and_bad_url() {
    let yaml = "name: svc\nbase_url: https://api.example.com\noperations: []\n";
    assert!(load_catalog_from_str(yaml).is_err());

    let yaml = catalog_with_operation(
        "  - name: ListThings\n    path: /things\n    cursor_param: t\n    server_page_cap: 5\n",
    )
    .replace("https://api.example.com", "not a url");
    assert!(matches!(
        load_catalog_from_str(&yaml).unwrap_err(),
        Error::InvalidUrl(_)
    ));
}

#[test]
fn test_reject_invalid_yaml() {
    let err = load_catalog_from_str("name: [unclosed").unwrap_err();
    assert!(matches!(err, Error::YamlParse(_)));
    assert!(err.is_config());
}

// ============================================================================
// Conversion Tests
// ============================================================================

#[test]
fn test_client_config() {
    let def = load_catalog_from_str(SHIELD).unwrap();
    let config = def.client_config();

    assert_eq!(config.base_url.as_deref(), Some("https://shield.example.com"));
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(
        config.retry,
        RetryPolicy {
            max_retries: 5,
            backoff: Backoff::Linear,
            initial_backoff_ms: 250,
            max_backoff_ms: 20_000,
        }
    );
    assert_eq!(config.retry.delay(1), Duration::from_millis(500));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 2)));
    assert!(config.user_agent.starts_with("pagewalk/"));
    assert_eq!(
        config.default_headers.get("X-Api-Version").map(String::as_str),
        Some("2016-06-02")
    );
}

#[test]
fn test_client_config_without_rate_limit() {
    let yaml = catalog_with_operation(
        "  - name: ListThings\n    path: /things\n    cursor_param: t\n    server_page_cap: 5\n",
    );
    let def = load_catalog_from_str(&yaml).unwrap();
    assert!(def.client_config().rate_limit.is_none());
}

#[test]
fn test_operation_endpoint() {
    let def = load_catalog_from_str(SHIELD).unwrap();

    let attacks = def.find("ListAttacks").unwrap().endpoint();
    assert_eq!(attacks.method, Method::GET);
    assert_eq!(attacks.path, "/attacks");
    assert_eq!(attacks.cursor_param, "NextToken");
    assert_eq!(attacks.page_size_param.as_deref(), Some("MaxResults"));
    assert_eq!(attacks.shape.items_path.as_deref(), Some("AttackSummaries"));
    assert_eq!(attacks.shape.cursor_path, "NextToken");

    let policies = def.find("ListPolicies").unwrap().endpoint();
    assert_eq!(policies.method, Method::POST);
    assert_eq!(policies.shape.cursor_path, "NextMarker");
    assert_eq!(
        policies.headers.get("X-Amz-Target").map(String::as_str),
        Some("Shield.ListPolicies")
    );
}

#[test]
fn test_operation_fetch_options() {
    let def = load_catalog_from_str(SHIELD).unwrap();

    let options = def.find("ListPolicies").unwrap().fetch_options();
    assert_eq!(options.server_page_cap, 1000);
    assert_eq!(options.continue_rule, ContinueRule::NonNegative);
    assert!(options.target_count.is_none());
    assert!(!options.is_manual());
}

#[test]
fn test_merged_params() {
    let def = load_catalog_from_str(SHIELD).unwrap();
    let op = def.find("ListAttacks").unwrap();

    let mut overrides = StringMap::new();
    overrides.insert("StartTime".to_string(), "1700000000".to_string());
    overrides.insert("ResourceArn".to_string(), "arn:1".to_string());

    let params = op.merged_params(&overrides);
    assert_eq!(params.len(), 2);
    assert_eq!(params["StartTime"], "1700000000");
    assert_eq!(params["ResourceArn"], "arn:1");
}
