//! Range lookup statistics

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// How range lookups were resolved since the last reset
///
/// Every `get_range` call increments `total_requests` and exactly one of the
/// other three counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStats {
    /// Number of `get_range` calls
    pub total_requests: u64,
    /// Calls served from an unexpired cache entry
    pub cache_hits: u64,
    /// Calls that joined a computation already in flight
    pub deduped_requests: u64,
    /// Calls that started a new batched fetch
    pub actual_fetches: u64,
}

impl RangeStats {
    /// Cache hits as a percentage of all requests (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        percentage(self.cache_hits, self.total_requests)
    }

    /// Deduplicated requests as a percentage of all requests (0.0 to 100.0)
    pub fn dedup_rate(&self) -> f64 {
        percentage(self.deduped_requests, self.total_requests)
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

impl fmt::Display for RangeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requests={}, hits={}, deduped={}, fetches={}, hit_rate={:.1}%, dedup_rate={:.1}%",
            self.total_requests,
            self.cache_hits,
            self.deduped_requests,
            self.actual_fetches,
            self.hit_rate(),
            self.dedup_rate()
        )
    }
}

/// Lock-free counters behind [`RangeStats`]
#[derive(Debug, Default)]
pub(crate) struct RangeCounters {
    total_requests: AtomicU64,
    cache_hits: AtomicU64,
    deduped_requests: AtomicU64,
    actual_fetches: AtomicU64,
}

impl RangeCounters {
    pub(crate) fn record_hit(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dedup(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.deduped_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetch(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.actual_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> RangeStats {
        RangeStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            deduped_requests: self.deduped_requests.load(Ordering::Relaxed),
            actual_fetches: self.actual_fetches.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.deduped_requests.store(0, Ordering::Relaxed);
        self.actual_fetches.store(0, Ordering::Relaxed);
    }
}
