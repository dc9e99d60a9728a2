//! Periodic wholesale eviction of the range cache

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use super::RangeCache;

/// Slack added past the interval so a wake-up is strictly later than it
const MIN_TICK: Duration = Duration::from_millis(1);

/// Clears the whole range cache once per sweep interval
///
/// A sweep drops every cached range and date rather than expiring entries one
/// by one. Entity history memos are not touched.
#[derive(Debug)]
pub struct CacheJanitor {
    range: Arc<RangeCache>,
    interval: Duration,
    last_sweep: Mutex<Instant>,
    sweeps: AtomicU64,
}

impl CacheJanitor {
    pub fn new(range: Arc<RangeCache>, interval: Duration) -> Self {
        Self {
            range,
            interval,
            last_sweep: Mutex::new(Instant::now()),
            sweeps: AtomicU64::new(0),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sweeps if more than the interval has elapsed since the last sweep
    ///
    /// Returns true when a sweep happened.
    pub fn sweep_if_due(&self, now: Instant) -> bool {
        let mut last_sweep = self
            .last_sweep
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let elapsed = now.saturating_duration_since(*last_sweep);
        if elapsed <= self.interval {
            return false;
        }

        let dropped = self.range.sweep();
        *last_sweep = now;
        let sweeps = self.sweeps.fetch_add(1, Ordering::Relaxed) + 1;
        info!(dropped, sweeps, elapsed = ?elapsed, "Swept range cache");
        true
    }

    /// Earliest instant at which [`sweep_if_due`](Self::sweep_if_due) will
    /// sweep, or `None` if that lies beyond what `Instant` can represent
    pub fn next_due(&self) -> Option<Instant> {
        let last_sweep = *self
            .last_sweep
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        last_sweep.checked_add(self.interval.saturating_add(MIN_TICK))
    }

    /// Starts a background task that sweeps each time one becomes due
    ///
    /// The task sleeps until [`next_due`](Self::next_due) rather than polling
    /// on a fixed period, so entries never outlive the interval by more than
    /// scheduling delay. It holds only a weak reference and exits once the
    /// janitor is dropped. Abort the returned handle to stop it earlier.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let janitor = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                let Some(due) = janitor.upgrade().and_then(|janitor| janitor.next_due()) else {
                    debug!("Janitor dropped or never due; stopping sweeps");
                    break;
                };
                tokio::time::sleep_until(due).await;

                let Some(janitor) = janitor.upgrade() else {
                    debug!("Janitor dropped; stopping sweeps");
                    break;
                };
                janitor.sweep_if_due(Instant::now());
            }
        })
    }
}
