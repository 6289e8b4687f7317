//! CLI module
//!
//! Command-line interface for running listing operations.
//!
//! # Commands
//!
//! - `list` - Run an operation and stream its items
//! - `operations` - List operations in the catalog
//! - `validate` - Validate the catalog

mod commands;
mod runner;

pub use commands::{Cli, Commands, ListArgs, OutputFormat};
pub use runner::Runner;
