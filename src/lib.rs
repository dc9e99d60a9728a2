//! Read-through cache for sparse, date-indexed daily snapshots
//!
//! Given a start date and a lookback window, [`SnapshotCache::get_range`]
//! produces a [`DateMap`] of the records available on each date while keeping
//! round trips to the snapshot store to a minimum:
//!
//! - concurrent requests for the same window share one computation
//! - dates outside the publishing season or after today are never fetched
//! - candidates are fetched in bounded batches, most recent first, stopping
//!   once enough dates with data have been found
//! - results are cached for a TTL and swept wholesale by a janitor
//!
//! [`SnapshotCache::find_recent`] finds an entity's most recent occurrences in
//! a resolved map and memoizes the answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use snapcache::{CacheConfigBuilder, FsSnapshotSource, SnapshotCache};
//! use std::{sync::Arc, time::Duration};
//!
//! let config = CacheConfigBuilder::new()
//!     .ttl(Duration::from_secs(600))
//!     .build()?;
//! let cache = SnapshotCache::new(Arc::new(FsSnapshotSource::new("public")), config);
//!
//! let map = cache.get_range("2025-07-01".parse()?, 14).await;
//! let history = cache.find_recent("J. Smith", "NYM", &map, 3)?;
//! println!("{}", cache.stats());
//! ```

pub mod cache;
pub mod config;
pub mod dates;
pub mod errors;
pub mod fetch;
pub mod history;
mod service;
mod tracing;
pub mod types;

pub use cache::{CacheJanitor, RangeCache, RangeKey, RangeStats};
pub use config::{CacheConfig, CacheConfigBuilder};
pub use dates::{Clock, DateHeuristic, FixedClock, SeasonWindow, SystemClock};
pub use errors::{
    ConfigError, DateKeyError, FetchFailure, HistoryError, SnapcacheError, SourceError,
};
pub use fetch::{
    FetchGateway, FetchOutcome, FsSnapshotSource, MonthlyJsonLayout, SnapshotLayout,
    SnapshotSource,
};
pub use history::{EntityHistoryIndex, HistoryEntry, HistoryResult};
pub use service::SnapshotCache;
pub use types::{BatchSize, CandidateCap, DateKey, DateMap, EarlyStopThreshold, Record};
