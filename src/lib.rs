// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # pagewalk
//!
//! A generic cursor-pagination engine for listing APIs.
//!
//! Every paginated listing operation follows the same loop: send fixed
//! filter parameters plus a cursor and a page size, collect the items,
//! read the next cursor, repeat. `pagewalk` implements that loop once in
//! [`PagedFetcher`](pagination::PagedFetcher) and lets each operation
//! supply only its transport.
//!
//! ## Features
//!
//! - **Auto-iteration**: Walk every page until the server stops returning a cursor
//! - **Item budget**: Stop once a target count is met, shrinking the last request
//! - **Manual paging**: Fetch one page and hand back the cursor to resume from
//! - **Soft stop**: A failing later page of a bounded fetch keeps what was collected
//! - **Cancellation**: Stop between pages or mid-request through a token
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::pagination::{from_fn, FetchOptions, Page, PagedFetcher};
//!
//! #[tokio::main]
//! async fn main() -> pagewalk::Result<()> {
//!     let source = from_fn(|request| async move {
//!         let start: u32 = request.cursor().unwrap_or("0").parse().map_err(anyhow::Error::from)?;
//!         let end = (start + request.page_size).min(250);
//!         let next = (end < 250).then(|| end.to_string());
//!         Ok(Page::new((start..end).collect(), next))
//!     });
//!
//!     let options = FetchOptions::new(100).with_target_count(120);
//!     let outcome = PagedFetcher::new(source, options)?.collect(()).await?;
//!     assert_eq!(outcome.items.len(), 120);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        PagedFetcher                          │
//! │  pages() → Stream<Page>   items() → Stream<T>                │
//! │  collect() → FetchOutcome fetch_one(cursor) → ManualPage     │
//! └──────────────────────────────────────────────────────────────┘
//!                                │ PageSource
//! ┌──────────────┬───────────────┴──────┬────────────────────────┐
//! │  Operation   │   HTTP               │  Decode / Projection   │
//! ├──────────────┼──────────────────────┼────────────────────────┤
//! │ YAML catalog │ GET/POST page source │ Items path             │
//! │ Page cap     │ Retry / backoff      │ Cursor path            │
//! │ Continue rule│ Rate limit           │ Select fields          │
//! └──────────────┴──────────────────────┴────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pagination engine
pub mod pagination;

/// Response decoders
pub mod decode;

/// HTTP client and page source
pub mod http;

/// Listing-operation catalog
pub mod operation;

/// Output projection
pub mod projection;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use operation::{load_catalog, load_catalog_from_str, CatalogDefinition, OperationDefinition};
pub use pagination::{FetchOptions, FetchOutcome, PageSource, PagedFetcher, StopReason};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
