//! YAML parser for operation catalogs
//!
//! Parses and validates catalog files.

use super::types::{CatalogDefinition, OperationDefinition};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a catalog from a YAML file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read catalog file '{}': {e}",
            path.display()
        ))
    })?;
    load_catalog_from_str(&content)
}

/// Load a catalog from a YAML string
pub fn load_catalog_from_str(yaml: &str) -> Result<CatalogDefinition> {
    let def: CatalogDefinition = serde_yaml::from_str(yaml)?;

    validate_catalog(&def)?;
    Ok(def)
}

/// Validate a catalog definition
fn validate_catalog(def: &CatalogDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Catalog name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Catalog base_url cannot be empty"));
    }
    url::Url::parse(&def.base_url)?;

    if def.operations.is_empty() {
        return Err(Error::config("Catalog must have at least one operation"));
    }

    let names: HashSet<_> = def.operations.iter().map(|op| &op.name).collect();
    if names.len() != def.operations.len() {
        return Err(Error::config("Duplicate operation names found"));
    }

    for op in &def.operations {
        validate_operation(op)?;
    }

    Ok(())
}

/// Validate an operation definition
fn validate_operation(op: &OperationDefinition) -> Result<()> {
    if op.name.is_empty() {
        return Err(Error::config("Operation name cannot be empty"));
    }

    if op.path.is_empty() {
        return Err(Error::missing_field(format!("{}.path", op.name)));
    }

    if op.cursor_param.is_empty() {
        return Err(Error::missing_field(format!("{}.cursor_param", op.name)));
    }

    if op.server_page_cap == 0 {
        return Err(Error::invalid_value(
            format!("{}.server_page_cap", op.name),
            "must be greater than zero",
        ));
    }

    Ok(())
}
