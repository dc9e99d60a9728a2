//! Span creation helpers for snapcache operations.
//!
//! Telemetry concerns are kept apart from business logic: instead of
//! `#[instrument]` attributes on functions, each instrumented operation has a
//! span helper here. Async operations attach the span with
//! [`tracing::Instrument`] so it is not held across await points.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> T {
//!     let span = spans::my_operation(param);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use tracing::{Level, Span};

use crate::types::DateKey;

/// Create span for a range lookup.
///
/// This is the main public API entry point for range data.
///
/// Parent: caller's span
/// Children: compute_range span (only on the call that starts the computation)
#[inline]
pub(crate) fn get_range(start: DateKey, lookback_days: u32) -> Span {
    tracing::span!(
        Level::INFO,
        "snapcache.get_range",
        start = %start,
        lookback_days = lookback_days,
    )
}

/// Create span for the batched fetch behind a range cache miss.
///
/// Parent: get_range span of the caller that started the computation
/// Children: fetch_date spans (one per candidate fetched)
#[inline]
pub(crate) fn compute_range(start: DateKey, lookback_days: u32, candidates: usize) -> Span {
    tracing::debug_span!(
        "snapcache.compute_range",
        start = %start,
        lookback_days = lookback_days,
        candidates = candidates,
    )
}

/// Create span for fetching one date's snapshot.
///
/// Parent: compute_range or get_date span
/// Children: None
#[inline]
pub(crate) fn fetch_date(date: DateKey, address: &str) -> Span {
    tracing::trace_span!("snapcache.fetch_date", date = %date, address = address)
}

/// Create span for a single-date lookup.
///
/// Parent: caller's span
/// Children: fetch_date span (only on the call that starts the fetch)
#[inline]
pub(crate) fn get_date(date: DateKey) -> Span {
    tracing::debug_span!("snapcache.get_date", date = %date)
}

/// Create span for an entity history lookup.
///
/// Parent: caller's span
/// Children: None
#[inline]
pub(crate) fn find_recent(entity_name: &str, entity_group: &str, limit: usize) -> Span {
    tracing::debug_span!(
        "snapcache.find_recent",
        entity_name = entity_name,
        entity_group = entity_group,
        limit = limit,
    )
}
