//! Tests for decoder module

use super::*;
use serde_json::json;

// ============================================================================
// ResponseShape Tests
// ============================================================================

#[test]
fn test_response_shape_default() {
    let shape = ResponseShape::default();
    assert_eq!(shape.items_path, Some("items".to_string()));
    assert_eq!(shape.cursor_path, "next_token");
}

#[test]
fn test_response_shape_serde() {
    let shape: ResponseShape =
        serde_yaml::from_str("items_path: Attacks\ncursor_path: NextToken\n").unwrap();
    assert_eq!(shape, ResponseShape::new("Attacks", "NextToken"));

    let shape: ResponseShape = serde_yaml::from_str("cursor_path: NextMarker\n").unwrap();
    assert_eq!(shape, ResponseShape::root("NextMarker"));
}

// ============================================================================
// JsonPageDecoder Tests
// ============================================================================

#[test]
fn test_decode_items_and_cursor() {
    let decoder = JsonPageDecoder::new(ResponseShape::new("Attacks", "NextToken"));
    let body = r#"{"Attacks": [{"AttackId": "a1"}, {"AttackId": "a2"}], "NextToken": "tok"}"#;

    let page = decoder.decode(body).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.items[1]["AttackId"], "a2");
    assert_eq!(page.next_cursor, Some("tok".to_string()));
}

#[test]
fn test_decode_last_page() {
    let decoder = JsonPageDecoder::new(ResponseShape::new("Attacks", "NextToken"));

    // Missing, null and empty tokens all end the listing
    for body in [
        r#"{"Attacks": [{"AttackId": "a1"}]}"#,
        r#"{"Attacks": [{"AttackId": "a1"}], "NextToken": null}"#,
        r#"{"Attacks": [{"AttackId": "a1"}], "NextToken": ""}"#,
    ] {
        let page = decoder.decode(body).unwrap();
        assert!(page.is_last(), "body: {body}");
        assert_eq!(page.len(), 1);
    }
}

#[test]
fn test_decode_nested_paths() {
    let decoder = JsonPageDecoder::new(ResponseShape::new("$.result.items", "$.result.marker"));
    let value = json!({"result": {"items": [1, 2, 3], "marker": 42}});

    let page = decoder.decode_value(&value).unwrap();
    assert_eq!(page.items, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(page.next_cursor, Some("42".to_string()));
}

#[test]
fn test_decode_missing_items_is_empty_page() {
    let decoder = JsonPageDecoder::new(ResponseShape::new("Policies", "NextMarker"));
    let page = decoder.decode(r#"{"NextMarker": "m1"}"#).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.next_cursor, Some("m1".to_string()));
}

#[test]
fn test_decode_items_not_array() {
    let decoder = JsonPageDecoder::new(ResponseShape::new("Policies", "NextMarker"));
    let err = decoder.decode(r#"{"Policies": "oops"}"#).unwrap_err();
    assert!(err.to_string().contains("Expected an array at 'Policies'"));
}

#[test]
fn test_decode_root_array() {
    let decoder = JsonPageDecoder::new(ResponseShape::root("next"));
    let page = decoder.decode(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.is_last());
}

#[test]
fn test_decode_jsonpath_wildcard() {
    let decoder = JsonPageDecoder::new(ResponseShape::new("$.data[*]", "cursor"));
    let page = decoder
        .decode(r#"{"data": [{"id": 1}, {"id": 2}], "cursor": "c2"}"#)
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.next_cursor, Some("c2".to_string()));
}

#[test]
fn test_decode_empty_body() {
    let decoder = JsonPageDecoder::default();
    assert!(decoder.decode("   ").is_err());
}

#[test]
fn test_decode_invalid_json() {
    let decoder = JsonPageDecoder::default();
    let err = decoder.decode("{not json").unwrap_err();
    assert!(matches!(err, crate::error::Error::JsonParse(_)));
}

// ============================================================================
// Path Helper Tests
// ============================================================================

#[test]
fn test_extract_path() {
    let value = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});

    assert_eq!(extract_path(&value, "a.b[0].c"), Some(json!(1)));
    assert_eq!(extract_path(&value, "$.a.b[-1].c"), Some(json!(2)));
    assert_eq!(extract_path(&value, "a.b[5]"), None);
    assert_eq!(extract_path(&value, "a.missing"), None);
    assert_eq!(extract_path(&value, "$"), Some(value.clone()));
}

#[test]
fn test_extract_scalar() {
    let value = json!({"s": "x", "n": 7, "b": true, "o": {}, "z": null});

    assert_eq!(extract_scalar(&value, "s"), Some("x".to_string()));
    assert_eq!(extract_scalar(&value, "n"), Some("7".to_string()));
    assert_eq!(extract_scalar(&value, "b"), Some("true".to_string()));
    assert_eq!(extract_scalar(&value, "o"), None);
    assert_eq!(extract_scalar(&value, "z"), None);
}
