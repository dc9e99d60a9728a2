// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Range cache: `(start, lookback)` → [`DateMap`]
//!
//! A miss generates heuristic candidates, fetches them in fixed-size batches
//! (concurrent within a batch, sequential across batches, most recent first)
//! and stops after the batch in which the early-stop threshold is met. Single
//! dates can be looked up through the same coalescing discipline.

use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, Instrument};

use super::stats::{RangeCounters, RangeStats};
use super::store::{CoalescingCache, Lookup};
use crate::config::CacheConfig;
use crate::dates::{Clock, DateHeuristic};
use crate::fetch::{FetchGateway, FetchOutcome};
use crate::tracing::spans;
use crate::types::{BatchSize, CandidateCap, DateKey, DateMap, EarlyStopThreshold, Record};

/// Cache key for one range lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeKey {
    start: DateKey,
    lookback_days: u32,
}

impl RangeKey {
    pub const fn new(start: DateKey, lookback_days: u32) -> Self {
        Self {
            start,
            lookback_days,
        }
    }

    pub const fn start(&self) -> DateKey {
        self.start
    }

    pub const fn lookback_days(&self) -> u32 {
        self.lookback_days
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range_{}_{}", self.start, self.lookback_days)
    }
}

/// The parts of a range computation that outlive the caller
#[derive(Debug)]
struct RangeFetcher {
    gateway: Arc<FetchGateway>,
    heuristic: DateHeuristic,
    clock: Arc<dyn Clock>,
    batch_size: BatchSize,
    candidate_cap: CandidateCap,
    early_stop: EarlyStopThreshold,
}

impl RangeFetcher {
    async fn fetch_range(&self, key: RangeKey) -> DateMap {
        let today = self.clock.today();
        let candidates = self.heuristic.generate_candidates(
            key.start(),
            key.lookback_days(),
            self.candidate_cap,
            today,
        );
        let span = spans::compute_range(key.start(), key.lookback_days(), candidates.len());

        async move {
            debug!(
                today = %today,
                candidates = candidates.len(),
                batches = self.batch_size.batches_needed(candidates.len()),
                "Fetching range"
            );

            let mut map = DateMap::new();
            let mut success_count = 0usize;
            let mut fetched = 0usize;

            for batch in self.batch_size.batches(&candidates) {
                let outcomes =
                    join_all(batch.iter().map(|&date| self.gateway.fetch_date(date))).await;
                fetched += batch.len();

                for (&date, outcome) in batch.iter().zip(outcomes) {
                    if let FetchOutcome::Records(records) = outcome {
                        map.insert(date, records);
                        success_count += 1;
                    }
                }

                if self.early_stop.is_met(success_count) {
                    debug!(
                        success_count,
                        skipped = candidates.len() - fetched,
                        "Early-stop threshold met"
                    );
                    break;
                }
            }

            debug!(
                dates_with_data = map.dates_with_data(),
                records = map.record_count(),
                fetched,
                "Range resolved"
            );
            map
        }
        .instrument(span)
        .await
    }
}

/// TTL cache of range lookups with in-flight coalescing
///
/// Concurrent calls for the same `(start, lookback)` share one computation.
/// A computation that has started runs to completion even when its callers
/// stop waiting, so the result still benefits later callers.
///
/// Must be used from within a tokio runtime.
pub struct RangeCache {
    fetcher: Arc<RangeFetcher>,
    ranges: CoalescingCache<RangeKey, Arc<DateMap>>,
    dates: CoalescingCache<DateKey, Option<Arc<Vec<Record>>>>,
    counters: RangeCounters,
}

impl RangeCache {
    pub fn new(gateway: Arc<FetchGateway>, clock: Arc<dyn Clock>, config: &CacheConfig) -> Self {
        let fetcher = RangeFetcher {
            gateway,
            heuristic: DateHeuristic::new(config.season),
            clock,
            batch_size: config.batch_size,
            candidate_cap: config.candidate_cap,
            early_stop: config.early_stop,
        };
        Self {
            fetcher: Arc::new(fetcher),
            ranges: CoalescingCache::new(config.ttl),
            dates: CoalescingCache::new(config.ttl),
            counters: RangeCounters::default(),
        }
    }

    /// Returns the records available in the window ending at `start`
    ///
    /// Never fails: dates that could not be fetched are simply absent from
    /// the map. At most `max_lookback_days` days are considered, walking
    /// backward from `start`.
    pub async fn get_range(&self, start: DateKey, max_lookback_days: u32) -> Arc<DateMap> {
        let key = RangeKey::new(start, max_lookback_days);
        let span = spans::get_range(start, max_lookback_days);

        async move {
            let fetcher = Arc::clone(&self.fetcher);
            let lookup = self.ranges.lookup(key, move || async move {
                Arc::new(fetcher.fetch_range(key).await)
            });

            match &lookup {
                Lookup::Hit(_) => {
                    self.counters.record_hit();
                    debug!(key = %key, "Range cache hit");
                }
                Lookup::Joined(_) => {
                    self.counters.record_dedup();
                    debug!(key = %key, "Range request deduplicated");
                }
                Lookup::Started(_) => {
                    self.counters.record_fetch();
                    debug!(key = %key, "Range cache miss");
                }
            }

            lookup.resolve().await
        }
        .instrument(span)
        .await
    }

    /// Returns one date's records
    ///
    /// `None` when the snapshot is unavailable, an empty vector when it is
    /// confirmed empty. Both outcomes are cached for the TTL. The season
    /// filter is not applied.
    pub async fn get_date(&self, date: DateKey) -> Option<Arc<Vec<Record>>> {
        let span = spans::get_date(date);

        async move {
            let gateway = Arc::clone(&self.fetcher.gateway);
            self.dates
                .lookup(date, move || async move {
                    gateway.fetch_date(date).await.into_records().map(Arc::new)
                })
                .resolve()
                .await
        }
        .instrument(span)
        .await
    }

    /// Drops every cached range and date, and forgets in-flight computations
    pub fn clear(&self) {
        self.ranges.clear();
        self.dates.clear();
    }

    /// Drops every cached range and date; in-flight computations keep running
    /// and will still populate the cache
    ///
    /// Returns the number of entries dropped.
    pub fn sweep(&self) -> usize {
        self.ranges.clear_entries() + self.dates.clear_entries()
    }

    pub fn stats(&self) -> RangeStats {
        self.counters.snapshot()
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }

    /// Number of cached ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cached single dates
    pub fn cached_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of range computations currently running
    pub fn in_flight(&self) -> usize {
        self.ranges.in_flight_len()
    }

    pub fn ttl(&self) -> Duration {
        self.ranges.ttl()
    }

    pub fn heuristic(&self) -> DateHeuristic {
        self.fetcher.heuristic
    }
}

impl fmt::Debug for RangeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeCache")
            .field("fetcher", &self.fetcher)
            .field("ttl", &self.ttl())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfigBuilder;
    use crate::dates::FixedClock;
    use crate::errors::SourceError;
    use crate::fetch::{MonthlyJsonLayout, SnapshotLayout, SnapshotSource};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves the same body for every address and records what was asked
    struct UniformSource {
        body: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl UniformSource {
        fn new(body: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SnapshotSource for UniformSource {
        async fn fetch(&self, address: &str) -> Result<Option<Vec<u8>>, SourceError> {
            self.calls.lock().unwrap().push(address.to_string());
            Ok(self.body.map(|body| body.as_bytes().to_vec()))
        }

        fn name(&self) -> &'static str {
            "UniformSource"
        }
    }

    const ONE_RECORD: &str = r#"{"players":[{"name":"J. Smith","team":"NYM"}]}"#;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn range_cache(source: Arc<UniformSource>, config: CacheConfig) -> RangeCache {
        let gateway = FetchGateway::new(
            source,
            Arc::new(MonthlyJsonLayout::default()),
            config.fetch_timeout,
        );
        RangeCache::new(
            Arc::new(gateway),
            Arc::new(FixedClock::new(key("2025-07-15"))),
            &config,
        )
    }

    #[test]
    fn range_key_display() {
        let key = RangeKey::new(key("2025-07-01"), 14);
        assert_eq!(key.to_string(), "range_2025-07-01_14");
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let source = UniformSource::new(Some(ONE_RECORD));
        let cache = range_cache(Arc::clone(&source), CacheConfig::default());

        let first = cache.get_range(key("2025-07-01"), 5).await;
        assert_eq!(first.len(), 5);
        assert_eq!(first.newest(), Some(key("2025-07-01")));
        assert_eq!(first.oldest(), Some(key("2025-06-27")));
        assert_eq!(source.calls().len(), 5);

        let second = cache.get_range(key("2025-07-01"), 5).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls().len(), 5);

        let stats = cache.stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.actual_fetches, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn whole_batch_is_awaited_before_early_stop() {
        let source = UniformSource::new(Some(ONE_RECORD));
        let config = CacheConfigBuilder::new()
            .batch_size(10)
            .early_stop(25)
            .build()
            .unwrap();
        let cache = range_cache(Arc::clone(&source), config);

        let map = cache.get_range(key("2025-07-10"), 100).await;

        // Threshold is met inside the third batch; that batch still completes
        assert_eq!(source.calls().len(), 30);
        assert_eq!(map.len(), 30);
        assert_eq!(map.oldest(), Some(key("2025-06-11")));
    }

    #[tokio::test]
    async fn fetches_most_recent_first_and_skips_off_season_and_future() {
        let source = UniformSource::new(None);
        let cache = range_cache(Arc::clone(&source), CacheConfig::default());

        // Starts after "today" (2025-07-15) so the first three days are skipped
        let map = cache.get_range(key("2025-07-18"), 6).await;
        assert!(map.is_empty());
        let layout = MonthlyJsonLayout::default();
        let expected: Vec<String> = ["2025-07-15", "2025-07-14", "2025-07-13"]
            .iter()
            .map(|d| layout.address(key(d)))
            .collect();
        assert_eq!(source.calls(), expected);

        // Entirely off-season: nothing fetched, empty map still cached
        let map = cache.get_range(key("2025-01-31"), 30).await;
        assert!(map.is_empty());
        assert_eq!(source.calls().len(), 3);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn single_dates_cache_absence_and_presence() {
        let source = UniformSource::new(None);
        let cache = range_cache(Arc::clone(&source), CacheConfig::default());

        assert!(cache.get_date(key("2025-06-29")).await.is_none());
        assert!(cache.get_date(key("2025-06-29")).await.is_none());
        assert_eq!(source.calls().len(), 1);
        assert_eq!(cache.cached_dates(), 1);

        // Single-date lookups don't count as range requests
        assert_eq!(cache.stats().total_requests, 0);

        let source = UniformSource::new(Some(ONE_RECORD));
        let cache = range_cache(Arc::clone(&source), CacheConfig::default());
        let records = cache.get_date(key("2025-06-29")).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].matches("J. Smith", "NYM"));
    }

    #[tokio::test]
    async fn sweep_keeps_stats_and_forces_refetch() {
        let source = UniformSource::new(Some(ONE_RECORD));
        let cache = range_cache(Arc::clone(&source), CacheConfig::default());

        cache.get_range(key("2025-07-01"), 3).await;
        cache.get_date(key("2025-07-01")).await;
        assert_eq!(cache.sweep(), 2);
        assert!(cache.is_empty());

        cache.get_range(key("2025-07-01"), 3).await;
        assert_eq!(source.calls().len(), 3 + 1 + 3);
        assert_eq!(cache.stats().actual_fetches, 2);

        cache.reset_stats();
        assert_eq!(cache.stats(), RangeStats::default());
    }
}
