//! The cache service object owned by the composing application

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

use crate::cache::{CacheJanitor, RangeCache, RangeStats};
use crate::config::constants::{DEFAULT_HISTORY_LENGTH, DEFAULT_LOOKBACK_DAYS};
use crate::config::CacheConfig;
use crate::dates::{Clock, SystemClock};
use crate::errors::{HistoryError, SnapcacheError};
use crate::fetch::{FetchGateway, MonthlyJsonLayout, SnapshotLayout, SnapshotSource};
use crate::history::{EntityHistoryIndex, HistoryEntry, HistoryResult};
use crate::types::{DateKey, DateMap, Record};

/// Read-through cache over a sparse, date-indexed snapshot store
///
/// Owns the range cache, the entity history memo and the janitor. Construct
/// one per process and share it behind an `Arc`; there is no hidden global
/// state.
///
/// # Examples
///
/// ```rust,ignore
/// use snapcache::{CacheConfig, FsSnapshotSource, SnapshotCache};
/// use std::sync::Arc;
///
/// let cache = Arc::new(SnapshotCache::new(
///     Arc::new(FsSnapshotSource::new("public")),
///     CacheConfig::default(),
/// ));
/// let _janitor = cache.spawn_janitor();
///
/// let map = cache.get_range("2025-07-01".parse()?, 14).await;
/// let history = cache.find_recent("J. Smith", "NYM", &map, 3)?;
/// for entry in history.iter() {
///     println!("{}: {:?}", entry.date, entry.record.field("H"));
/// }
/// ```
#[derive(Debug)]
pub struct SnapshotCache {
    range: Arc<RangeCache>,
    history: EntityHistoryIndex,
    janitor: Arc<CacheJanitor>,
    config: CacheConfig,
}

impl SnapshotCache {
    /// Creates a cache using the default monthly layout and the system clock
    pub fn new(source: Arc<dyn SnapshotSource>, config: CacheConfig) -> Self {
        Self::with_collaborators(
            source,
            Arc::new(MonthlyJsonLayout::default()),
            Arc::new(SystemClock),
            config,
        )
    }

    /// Creates a cache with an explicit address layout and clock
    pub fn with_collaborators(
        source: Arc<dyn SnapshotSource>,
        layout: Arc<dyn SnapshotLayout>,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Self {
        let gateway = Arc::new(FetchGateway::new(source, layout, config.fetch_timeout));
        let range = Arc::new(RangeCache::new(gateway, clock, &config));
        let janitor = Arc::new(CacheJanitor::new(
            Arc::clone(&range),
            config.sweep_interval,
        ));
        Self {
            range,
            history: EntityHistoryIndex::new(),
            janitor,
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// See [`RangeCache::get_range`]
    pub async fn get_range(&self, start: DateKey, max_lookback_days: u32) -> Arc<DateMap> {
        self.range.get_range(start, max_lookback_days).await
    }

    /// See [`RangeCache::get_date`]
    pub async fn get_date(&self, date: DateKey) -> Option<Arc<Vec<Record>>> {
        self.range.get_date(date).await
    }

    /// See [`EntityHistoryIndex::find_recent`]
    pub fn find_recent(
        &self,
        entity_name: &str,
        entity_group: &str,
        date_map: &DateMap,
        limit: usize,
    ) -> Result<Arc<HistoryResult>, HistoryError> {
        self.history
            .find_recent(entity_name, entity_group, date_map, limit)
    }

    /// See [`EntityHistoryIndex::find_most_recent`]
    pub fn find_most_recent(
        &self,
        entity_name: &str,
        entity_group: &str,
        date_map: &DateMap,
    ) -> Result<Option<HistoryEntry>, HistoryError> {
        self.history
            .find_most_recent(entity_name, entity_group, date_map)
    }

    /// Resolves the range, then looks up the entity's history in it
    pub async fn find_recent_in_range(
        &self,
        entity_name: &str,
        entity_group: &str,
        start: DateKey,
        max_lookback_days: u32,
        limit: usize,
    ) -> Result<Arc<HistoryResult>, HistoryError> {
        let date_map = self.get_range(start, max_lookback_days).await;
        self.find_recent(entity_name, entity_group, &date_map, limit)
    }

    /// The entity's last few occurrences within the default lookback window
    /// ending at `start`
    pub async fn recent_history(
        &self,
        entity_name: &str,
        entity_group: &str,
        start: DateKey,
    ) -> Result<Arc<HistoryResult>, HistoryError> {
        self.find_recent_in_range(
            entity_name,
            entity_group,
            start,
            DEFAULT_LOOKBACK_DAYS,
            DEFAULT_HISTORY_LENGTH,
        )
        .await
    }

    /// [`recent_history`](Self::recent_history) for a `YYYY-MM-DD` start date
    ///
    /// # Errors
    ///
    /// Returns [`SnapcacheError::DateKey`] for an unparseable date and
    /// [`SnapcacheError::History`] for invalid lookup arguments.
    pub async fn recent_history_at(
        &self,
        entity_name: &str,
        entity_group: &str,
        start: &str,
    ) -> Result<Arc<HistoryResult>, SnapcacheError> {
        let start: DateKey = start.parse()?;
        Ok(self
            .recent_history(entity_name, entity_group, start)
            .await?)
    }

    /// Drops every cached range and date, the in-flight table and the
    /// history memo
    ///
    /// Computations already running finish but don't repopulate the cache.
    pub fn clear_all(&self) {
        self.range.clear();
        self.history.clear();
        info!("Cleared all snapshot caches");
    }

    pub fn stats(&self) -> RangeStats {
        self.range.stats()
    }

    pub fn reset_stats(&self) {
        self.range.reset_stats();
    }

    /// See [`CacheJanitor::sweep_if_due`]
    pub fn sweep_if_due(&self, now: Instant) -> bool {
        self.janitor.sweep_if_due(now)
    }

    /// Starts periodic sweeps in the background
    ///
    /// The task stops on its own once this cache is dropped.
    pub fn spawn_janitor(&self) -> JoinHandle<()> {
        self.janitor.spawn()
    }

    pub fn range_cache(&self) -> &RangeCache {
        &self.range
    }

    pub fn history(&self) -> &EntityHistoryIndex {
        &self.history
    }
}
