//! Listing-operation catalog
//!
//! Parse operation catalogs from YAML files.
//!
//! # Overview
//!
//! The operation module provides:
//! - `CatalogDefinition` - A service's base URL, HTTP settings and operations
//! - `OperationDefinition` - Transport description, page cap and continue rule
//! - YAML parsing with validation
//!
//! ```yaml
//! name: shield
//! base_url: https://shield.example.com
//! operations:
//!   - name: ListAttacks
//!     path: /attacks
//!     cursor_param: NextToken
//!     page_size_param: MaxResults
//!     items_path: AttackSummaries
//!     server_page_cap: 100
//! ```

mod parser;
mod types;

pub use parser::{load_catalog, load_catalog_from_str};
pub use types::{CatalogDefinition, HttpDefinition, OperationDefinition};

#[cfg(test)]
mod tests;
