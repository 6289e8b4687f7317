//! Pagination types
//!
//! Request, page, budget and option types shared by the fetch engine and
//! every page source.

use crate::error::{Error, Result};
use crate::types::NonEmpty;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request / Page
// ============================================================================

/// A single page request
///
/// Built once per fetch operation and mutated in place: `params` never
/// changes, `cursor` and `page_size` are rewritten before every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<P> {
    /// Fixed filter parameters
    pub params: P,
    /// Continuation token for this page (`None` on the first page)
    pub cursor: Option<String>,
    /// Number of items requested
    pub page_size: u32,
}

impl<P> PageRequest<P> {
    /// Create a request with no cursor
    pub fn new(params: P) -> Self {
        Self {
            params,
            cursor: None,
            page_size: 0,
        }
    }

    /// Create a request resuming from a cursor
    pub fn with_cursor(params: P, cursor: Option<String>) -> Self {
        Self {
            params,
            cursor: cursor.non_empty(),
            page_size: 0,
        }
    }

    /// Cursor as a string slice
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// One batch of items returned by a single round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Token for the following page; `None` when the listing is exhausted
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a page, treating an empty cursor as absent
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.non_empty(),
        }
    }

    /// Create the final page of a listing
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carried no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the server signalled the end of the listing
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

// ============================================================================
// Options
// ============================================================================

/// When to keep looping while a target count is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinueRule {
    /// Continue while `remaining > 0`
    #[default]
    Positive,
    /// Continue while `remaining >= 0`, fetching one more page when the
    /// target is hit exactly
    NonNegative,
}

impl ContinueRule {
    /// Check whether another page may be fetched with `remaining` items left
    pub fn allows(self, remaining: i64) -> bool {
        match self {
            Self::Positive => remaining > 0,
            Self::NonNegative => remaining >= 0,
        }
    }
}

/// Options for one fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Resume from this cursor; enables manual mode
    pub starting_cursor: Option<String>,
    /// Stop once at least this many items were retrieved
    pub target_count: Option<i64>,
    /// Maximum page size the remote operation accepts
    pub server_page_cap: u32,
    /// Boundary applied to the remaining target
    pub continue_rule: ContinueRule,
    /// Fetch a single page even without a starting cursor
    pub manual: bool,
    /// Surface cancellation as `Error::Cancelled` instead of a clean stop
    pub error_on_cancel: bool,
}

impl FetchOptions {
    /// Create options for an operation with the given page cap
    pub fn new(server_page_cap: u32) -> Self {
        Self {
            starting_cursor: None,
            target_count: None,
            server_page_cap,
            continue_rule: ContinueRule::default(),
            manual: false,
            error_on_cancel: false,
        }
    }

    /// Resume from a cursor (single page)
    #[must_use]
    pub fn with_starting_cursor(mut self, cursor: impl Into<String>) -> Self {
        let cursor: String = cursor.into();
        self.starting_cursor = cursor.non_empty();
        self
    }

    /// Set the item budget
    #[must_use]
    pub fn with_target_count(mut self, count: i64) -> Self {
        self.target_count = Some(count);
        self
    }

    /// Set the continue rule
    #[must_use]
    pub fn with_continue_rule(mut self, rule: ContinueRule) -> Self {
        self.continue_rule = rule;
        self
    }

    /// Fetch exactly one page per call
    #[must_use]
    pub fn with_manual_paging(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Raise `Error::Cancelled` when the fetch is cancelled
    #[must_use]
    pub fn with_error_on_cancel(mut self, error_on_cancel: bool) -> Self {
        self.error_on_cancel = error_on_cancel;
        self
    }

    /// Check if the caller drives pagination by hand
    pub fn is_manual(&self) -> bool {
        self.manual || self.starting_cursor.is_some()
    }

    /// Reject invalid combinations before any network call
    pub fn validate(&self) -> Result<()> {
        if self.server_page_cap == 0 {
            return Err(Error::invalid_value(
                "server_page_cap",
                "must be greater than zero",
            ));
        }
        if let Some(target) = self.target_count {
            if target < 0 {
                return Err(Error::invalid_value(
                    "target_count",
                    format!("must not be negative (got {target})"),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Budget
// ============================================================================

/// Tracks how many items were retrieved against the caller's target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchBudget {
    /// Items still wanted (`None` = unbounded)
    remaining_target: Option<i64>,
    /// Items retrieved so far
    retrieved_so_far: u64,
    /// Page size ceiling
    server_page_cap: u32,
}

impl FetchBudget {
    /// Create a budget
    pub fn new(target_count: Option<i64>, server_page_cap: u32) -> Self {
        Self {
            remaining_target: target_count,
            retrieved_so_far: 0,
            server_page_cap,
        }
    }

    /// Create a budget from fetch options
    pub fn from_options(options: &FetchOptions) -> Self {
        Self::new(options.target_count, options.server_page_cap)
    }

    /// Page size for the next request: `min(cap, remaining)`, never zero
    pub fn page_size(&self) -> u32 {
        match self.remaining_target {
            Some(remaining) => remaining.min(i64::from(self.server_page_cap)).max(1) as u32,
            None => self.server_page_cap,
        }
    }

    /// Account for a fetched page
    pub fn record(&mut self, count: usize) {
        self.retrieved_so_far += count as u64;
        if let Some(remaining) = self.remaining_target.as_mut() {
            *remaining -= count as i64;
        }
    }

    /// Check whether the target still allows another page
    pub fn should_continue(&self, rule: ContinueRule) -> bool {
        self.remaining_target.map_or(true, |r| rule.allows(r))
    }

    /// Check if a target count was set
    pub fn is_bounded(&self) -> bool {
        self.remaining_target.is_some()
    }

    /// Items retrieved so far
    pub fn retrieved(&self) -> u64 {
        self.retrieved_so_far
    }

    /// Items still wanted (negative once a page overshoots)
    pub fn remaining(&self) -> Option<i64> {
        self.remaining_target
    }

    /// Page size ceiling
    pub fn server_page_cap(&self) -> u32 {
        self.server_page_cap
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Why a fetch operation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The server returned no next cursor
    Exhausted,
    /// The target count was met
    TargetReached,
    /// Manual mode: one page only
    Manual,
    /// A later page of a bounded fetch failed and the error was swallowed
    SoftError,
    /// A page failed and the error was returned
    Failed,
    /// The fetch was cancelled
    Cancelled,
}

impl StopReason {
    /// Check if more data may be available from the last cursor
    pub fn is_resumable(self) -> bool {
        !matches!(self, Self::Exhausted | Self::Failed)
    }
}

/// Everything collected by one fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome<T> {
    /// Items from every fetched page, in order
    pub items: Vec<T>,
    /// Cursor to resume from, if the listing was not exhausted
    pub next_cursor: Option<String>,
    /// Number of successful page fetches
    pub pages_fetched: usize,
    /// Total items retrieved
    pub retrieved: u64,
    /// Why the fetch stopped
    pub stop_reason: StopReason,
}

/// A single manually fetched page plus the cursor to resume from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualPage<T> {
    /// Items on the page
    pub items: Vec<T>,
    /// Cursor for the next manual call
    pub next_cursor: Option<String>,
}

impl<T> ManualPage<T> {
    /// Check if the listing has more pages
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
