//! Pagination module
//!
//! Cursor pagination with an optional client-side item budget.
//!
//! # Overview
//!
//! A listing operation is described by a [`PageSource`] (one round trip per
//! call) plus [`FetchOptions`] (page cap, target count, continue rule,
//! optional starting cursor). [`PagedFetcher`] loops over the source until
//! the server runs out of pages or the target is met, and exposes the
//! result as a lazy stream of pages or items, or as a collected
//! [`FetchOutcome`].
//!
//! ```text
//! START ──► FETCHING ──► CONTINUE ──┐
//!              ▲                    │
//!              └────────────────────┘
//!              │
//!              └──► DONE
//! ```

mod fetcher;
mod types;

pub use fetcher::{from_fn, FnSource, PageSource, PagedFetcher, ProgressHook};
pub use types::{
    ContinueRule, FetchBudget, FetchOptions, FetchOutcome, ManualPage, Page, PageRequest,
    StopReason,
};
