//! Response decoding module
//!
//! Turns a listing response body into a [`Page`](crate::pagination::Page).
//!
//! # Overview
//!
//! The decode module provides:
//! - `PageDecoder` - Trait for body → page conversion
//! - `JsonPageDecoder` - JSON bodies with configurable item and cursor paths
//! - Path helpers shared with the projection module

mod decoders;
mod types;

pub use decoders::{extract_path, extract_scalar, JsonPageDecoder};
pub use types::{PageDecoder, ResponseShape};

#[cfg(test)]
mod tests;
