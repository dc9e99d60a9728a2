//! Cached values with an expiry instant

use std::time::Duration;
use tokio::time::Instant;

/// A resolved value and the instant it stops being served
///
/// Entries are replaced wholesale on refresh and never mutated in place.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    value: V,
    /// `None` when `created + ttl` overflows, in which case the entry never expires
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(value: V, created: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: created.checked_add(ttl),
        }
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}
