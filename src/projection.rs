//! Output projection
//!
//! Reshapes fetched items after the engine has produced them. The engine
//! itself never projects: items flow through untouched and the caller
//! applies a [`Projection`] on the way out.

use crate::decode::extract_path;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::str::FromStr;

/// How each item is reshaped for output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Projection {
    /// The item as returned by the server
    #[default]
    Identity,
    /// A single value at a dot-path
    Field(String),
    /// An object holding several dot-paths, keyed by path
    Fields(Vec<String>),
}

impl Projection {
    /// Apply the projection to one item
    ///
    /// Paths missing from the item project to `null`.
    pub fn apply(&self, item: Value) -> Value {
        match self {
            Self::Identity => item,
            Self::Field(path) => extract_path(&item, path).unwrap_or(Value::Null),
            Self::Fields(paths) => {
                let object: Map<String, Value> = paths
                    .iter()
                    .map(|path| {
                        let value = extract_path(&item, path).unwrap_or(Value::Null);
                        (path.clone(), value)
                    })
                    .collect();
                Value::Object(object)
            }
        }
    }

    /// Check if the projection leaves items untouched
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

impl FromStr for Projection {
    type Err = Error;

    fn from_str(expression: &str) -> Result<Self> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(Error::projection(expression, "expression is empty"));
        }
        if trimmed == "*" {
            return Ok(Self::Identity);
        }

        if !trimmed.contains(',') {
            validate_path(expression, trimmed)?;
            return Ok(Self::Field(trimmed.to_string()));
        }

        let paths = trimmed
            .split(',')
            .map(str::trim)
            .map(|path| validate_path(expression, path).map(|()| path.to_string()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Fields(paths))
    }
}

fn validate_path(expression: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::projection(expression, "empty field name"));
    }
    if path == "*" {
        return Err(Error::projection(expression, "'*' cannot be combined with fields"));
    }
    if path.split('.').any(str::is_empty) {
        return Err(Error::projection(expression, format!("malformed path '{path}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attack() -> Value {
        json!({
            "AttackId": "a1",
            "ResourceArn": "arn:1",
            "Mitigations": [{"MitigationName": "m1"}]
        })
    }

    #[test]
    fn test_parse() {
        assert_eq!("*".parse::<Projection>().unwrap(), Projection::Identity);
        assert_eq!(
            " AttackId ".parse::<Projection>().unwrap(),
            Projection::Field("AttackId".to_string())
        );
        assert_eq!(
            "AttackId, ResourceArn".parse::<Projection>().unwrap(),
            Projection::Fields(vec!["AttackId".to_string(), "ResourceArn".to_string()])
        );
    }

    #[test]
    fn test_parse_errors() {
        for expression in ["", "  ", "AttackId,", "*,AttackId", "a..b"] {
            let err = expression.parse::<Projection>().unwrap_err();
            assert!(
                matches!(err, Error::Projection { .. }),
                "expression: {expression:?}"
            );
        }
    }

    #[test]
    fn test_apply_identity() {
        assert_eq!(Projection::Identity.apply(attack()), attack());
        assert!(Projection::default().is_identity());
    }

    #[test]
    fn test_apply_field() {
        let projection: Projection = "Mitigations[0].MitigationName".parse().unwrap();
        assert_eq!(projection.apply(attack()), json!("m1"));

        let projection: Projection = "Missing".parse().unwrap();
        assert_eq!(projection.apply(attack()), Value::Null);
    }

    #[test]
    fn test_apply_fields() {
        let projection: Projection = "AttackId,Missing".parse().unwrap();
        assert_eq!(
            projection.apply(attack()),
            json!({"AttackId": "a1", "Missing": null})
        );
    }
}
