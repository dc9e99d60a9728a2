//! Error types for the snapcache library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`FetchFailure`],
//!   [`HistoryError`], [`ConfigError`], ...)
//! - **Unified error type** ([`SnapcacheError`]) for callers that don't need to
//!   distinguish between error sources
//!
//! # Propagation policy
//!
//! Range lookups never fail. Per-date problems are classified as
//! [`FetchFailure`] and recorded as absence. The only errors a caller sees
//! synchronously are programmer errors ([`HistoryError`]) and invalid
//! configuration ([`ConfigError`]).
//!
//! # Examples
//!
//! ```rust
//! use snapcache::{CacheConfigBuilder, SnapcacheError};
//!
//! fn build() -> Result<(), SnapcacheError> {
//!     let _config = CacheConfigBuilder::new().batch_size(5).build()?;
//!     Ok(())
//! }
//! # build().unwrap();
//! ```

mod config;
mod fetch;
mod history;

pub use config::{ConfigError, DateKeyError};
pub use fetch::{FetchFailure, SourceError};
pub use history::HistoryError;

/// Unified error type for all snapcache operations.
///
/// All module-specific error types convert into `SnapcacheError` via `From`,
/// so `?` works across module boundaries.
#[derive(Debug, thiserror::Error)]
pub enum SnapcacheError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid date key input.
    #[error("Date error: {0}")]
    DateKey(#[from] DateKeyError),

    /// Invalid history lookup arguments.
    #[error("History lookup error: {0}")]
    History(#[from] HistoryError),

    /// Snapshot source failure surfaced by a direct source call.
    #[error("Snapshot source error: {0}")]
    Source(#[from] SourceError),

    /// Classified single-date fetch failure.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchFailure),
}
