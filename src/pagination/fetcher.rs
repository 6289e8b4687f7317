//! Paged fetch engine
//!
//! Drives a [`PageSource`] from the first page to the last, one request at
//! a time, while honouring the server page cap and the caller's item
//! budget.
//!
//! # Failure policy
//!
//! A failing page is fatal when it is the first page, or when no target
//! count was set. A failure on a later page of a bounded fetch is
//! swallowed: the fetch stops with [`StopReason::SoftError`] and whatever
//! was already retrieved stands as the result.

use super::types::{
    FetchBudget, FetchOptions, FetchOutcome, ManualPage, Page, PageRequest, StopReason,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// ============================================================================
// Page Source
// ============================================================================

/// One network round trip against a paginated listing operation
///
/// Implementations must not retry internally; retries belong to the
/// transport underneath.
#[async_trait]
pub trait PageSource<P, T>: Send + Sync
where
    P: Send + Sync,
    T: Send,
{
    /// Fetch the page described by `request`
    async fn fetch_page(&self, request: &PageRequest<P>) -> Result<Page<T>>;
}

/// Page source backed by an async closure
///
/// The closure receives an owned copy of the request.
pub struct FnSource<F> {
    f: F,
}

/// Wrap an async closure as a page source
pub fn from_fn<F>(f: F) -> FnSource<F> {
    FnSource { f }
}

#[async_trait]
impl<P, T, F, Fut> PageSource<P, T> for FnSource<F>
where
    P: Clone + Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(PageRequest<P>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    async fn fetch_page(&self, request: &PageRequest<P>) -> Result<Page<T>> {
        (self.f)(request.clone()).await
    }
}

#[async_trait]
impl<P, T, S> PageSource<P, T> for Arc<S>
where
    P: Send + Sync,
    T: Send,
    S: PageSource<P, T> + ?Sized,
{
    async fn fetch_page(&self, request: &PageRequest<P>) -> Result<Page<T>> {
        (**self).fetch_page(request).await
    }
}

/// Observer invoked after each successful page with
/// `(items_this_page, cursor_used)`
pub type ProgressHook = Arc<dyn Fn(usize, Option<&str>) + Send + Sync>;

// ============================================================================
// Fetch State
// ============================================================================

/// Mutable state of one fetch operation
#[derive(Debug)]
struct FetchState<P> {
    request: PageRequest<P>,
    budget: FetchBudget,
    manual: bool,
    pages_fetched: usize,
    stop_reason: Option<StopReason>,
}

// ============================================================================
// Paged Fetcher
// ============================================================================

/// Cursor pagination engine with a client-side item budget
pub struct PagedFetcher<S, P, T> {
    source: S,
    options: FetchOptions,
    progress: Option<ProgressHook>,
    cancel: Option<CancellationToken>,
    _marker: PhantomData<fn(P) -> T>,
}

impl<S, P, T> PagedFetcher<S, P, T>
where
    S: PageSource<P, T>,
    P: Send + Sync,
    T: Send,
{
    /// Create a fetcher, rejecting invalid options up front
    pub fn new(source: S, options: FetchOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            source,
            options,
            progress: None,
            cancel: None,
            _marker: PhantomData,
        })
    }

    /// Register a per-page progress observer
    #[must_use]
    pub fn with_progress<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize, Option<&str>) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(hook));
        self
    }

    /// Stop fetching when `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fetch options
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Lazy sequence of pages
    ///
    /// A fatal error is yielded once, after which the stream ends.
    pub fn pages(&self, params: P) -> impl Stream<Item = Result<Page<T>>> + '_ {
        let state = self.start(params);
        stream::unfold(state, move |mut state| async move {
            let page = self.next_page(&mut state).await?;
            Some((page, state))
        })
    }

    /// Lazy sequence of items, concatenated across pages in server order
    pub fn items(&self, params: P) -> impl Stream<Item = Result<T>> + '_ {
        self.pages(params)
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok)))
            .try_flatten()
    }

    /// Run the fetch to completion and collect every item
    pub async fn collect(&self, params: P) -> Result<FetchOutcome<T>> {
        let mut state = self.start(params);
        let mut items = Vec::new();

        while let Some(page) = self.next_page(&mut state).await {
            items.extend(page?.items);
        }

        Ok(FetchOutcome {
            items,
            next_cursor: state.request.cursor,
            pages_fetched: state.pages_fetched,
            retrieved: state.budget.retrieved(),
            stop_reason: state.stop_reason.unwrap_or(StopReason::Exhausted),
        })
    }

    /// Fetch exactly one page starting at `cursor`
    ///
    /// Feeding each returned `next_cursor` into the following call walks
    /// the same items an automatic fetch would.
    pub async fn fetch_one(&self, params: P, cursor: Option<String>) -> Result<ManualPage<T>> {
        let mut state = FetchState {
            request: PageRequest::with_cursor(params, cursor),
            budget: FetchBudget::from_options(&self.options),
            manual: true,
            pages_fetched: 0,
            stop_reason: None,
        };

        let items = match self.next_page(&mut state).await {
            Some(page) => page?.items,
            None => Vec::new(),
        };

        Ok(ManualPage {
            items,
            next_cursor: state.request.cursor,
        })
    }

    fn start(&self, params: P) -> FetchState<P> {
        let budget = FetchBudget::from_options(&self.options);
        let manual = self.options.is_manual();

        // A target already met (e.g. zero) needs no page at all.
        let stop_reason = if !manual && !budget.should_continue(self.options.continue_rule) {
            debug!("Target count already met, skipping fetch");
            Some(StopReason::TargetReached)
        } else {
            None
        };

        FetchState {
            request: PageRequest::with_cursor(params, self.options.starting_cursor.clone()),
            budget,
            manual,
            pages_fetched: 0,
            stop_reason,
        }
    }

    /// Advance one step of the state machine
    ///
    /// Returns `None` once the fetch is done.
    async fn next_page(&self, state: &mut FetchState<P>) -> Option<Result<Page<T>>> {
        if state.stop_reason.is_some() {
            return None;
        }

        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return self.cancelled(state);
        }

        state.request.page_size = state.budget.page_size();
        let cursor_used = state.request.cursor.clone();

        let fetched = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => None,
                result = self.source.fetch_page(&state.request) => Some(result),
            },
            None => Some(self.source.fetch_page(&state.request).await),
        };

        let Some(result) = fetched else {
            return self.cancelled(state);
        };

        match result {
            Ok(page) => {
                let count = page.len();
                state.budget.record(count);
                state.pages_fetched += 1;
                state.request.cursor.clone_from(&page.next_cursor);

                debug!(
                    "Page {}: fetched {} items (page_size={}, retrieved={})",
                    state.pages_fetched,
                    count,
                    state.request.page_size,
                    state.budget.retrieved()
                );

                if let Some(hook) = &self.progress {
                    hook(count, cursor_used.as_deref());
                }

                state.stop_reason = self.transition(state);
                Some(Ok(page))
            }
            Err(err) if state.budget.is_bounded() && state.budget.retrieved() > 0 => {
                warn!(
                    "Page {} failed after {} items, stopping early: {err}",
                    state.pages_fetched + 1,
                    state.budget.retrieved()
                );
                state.stop_reason = Some(StopReason::SoftError);
                None
            }
            Err(err) => {
                state.stop_reason = Some(StopReason::Failed);
                Some(Err(err))
            }
        }
    }

    /// Decide whether another page follows; `None` means continue
    fn transition(&self, state: &FetchState<P>) -> Option<StopReason> {
        if state.manual {
            Some(StopReason::Manual)
        } else if state.request.cursor.is_none() {
            Some(StopReason::Exhausted)
        } else if !state.budget.should_continue(self.options.continue_rule) {
            Some(StopReason::TargetReached)
        } else {
            None
        }
    }

    fn cancelled(&self, state: &mut FetchState<P>) -> Option<Result<Page<T>>> {
        let retrieved = state.budget.retrieved();
        info!("Fetch cancelled after {retrieved} items");
        state.stop_reason = Some(StopReason::Cancelled);

        if self.options.error_on_cancel {
            Some(Err(Error::Cancelled { retrieved }))
        } else {
            None
        }
    }
}

impl<S, P, T> std::fmt::Debug for PagedFetcher<S, P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedFetcher")
            .field("options", &self.options)
            .field("has_progress", &self.progress.is_some())
            .field("has_cancellation", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}
