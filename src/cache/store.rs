// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! TTL cache with in-flight request coalescing
//!
//! [`CoalescingCache::lookup`] resolves a key through one of three branches:
//! an unexpired cached value, an already running computation for the key, or a
//! freshly started computation. Checking the cache, checking the in-flight
//! table and registering a new computation happen inside one critical section
//! with no await point, so two callers can never both start work for the same
//! key.
//!
//! Computations are spawned onto the runtime and run to completion even if
//! every caller stops waiting; the result still lands in the cache. The cache
//! write and the in-flight removal happen in the same critical section, so a
//! caller arriving afterwards always sees one or the other.

use futures::FutureExt;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn, Instrument};

use super::entry::CacheEntry;
use super::in_flight::{InFlightTable, SharedComputation};

/// How a lookup was resolved
pub(crate) enum Lookup<V> {
    /// Served from an unexpired cache entry
    Hit(V),
    /// Attached to a computation another caller started
    Joined(SharedComputation<V>),
    /// Started a new computation
    Started(SharedComputation<V>),
}

impl<V: Clone> Lookup<V> {
    pub(crate) async fn resolve(self) -> V {
        match self {
            Lookup::Hit(value) => value,
            Lookup::Joined(computation) | Lookup::Started(computation) => computation.await,
        }
    }
}

struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    in_flight: InFlightTable<K, V>,
    /// Bumped by every full clear; computations from an older generation
    /// don't write back
    generation: u64,
}

fn lock<K, V>(state: &Mutex<CacheState<K, V>>) -> MutexGuard<'_, CacheState<K, V>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct CoalescingCache<K, V> {
    state: Arc<Mutex<CacheState<K, V>>>,
    ttl: Duration,
}

impl<K, V> CoalescingCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display + Send + 'static,
    V: Clone + Default + Send + Sync + 'static,
{
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                in_flight: InFlightTable::new(),
                generation: 0,
            })),
            ttl,
        }
    }

    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolves `key`, starting `compute` only when neither a fresh entry nor
    /// a running computation exists
    ///
    /// `compute` is called at most once and only on the `Started` branch. If
    /// the computation panics, nothing is cached and every awaiter receives
    /// `V::default()`.
    pub(crate) fn lookup<F, Fut>(&self, key: K, compute: F) -> Lookup<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let now = Instant::now();
        let mut state = lock(&self.state);

        if let Some(entry) = state.entries.get(&key) {
            if !entry.is_expired(now) {
                return Lookup::Hit(entry.value().clone());
            }
            debug!(key = %key, "Cache entry expired");
            state.entries.remove(&key);
        }

        if let Some(computation) = state.in_flight.get(&key) {
            debug!(key = %key, "Joining in-flight computation");
            return Lookup::Joined(computation);
        }

        let guard = SettleGuard {
            state: Arc::clone(&self.state),
            key: key.clone(),
            generation: state.generation,
            ttl: self.ttl,
            settled: false,
        };
        let work = compute();
        let task = tokio::spawn(
            async move {
                let value = work.await;
                guard.settle(value.clone());
                value
            }
            .in_current_span(),
        );

        let task_key = key.to_string();
        let computation = async move {
            match task.await {
                Ok(value) => value,
                Err(e) => {
                    warn!(key = %task_key, error = %e, "Computation failed; nothing cached");
                    V::default()
                }
            }
        }
        .boxed()
        .shared();

        let generation = state.generation;
        state
            .in_flight
            .insert(key, generation, computation.clone());
        Lookup::Started(computation)
    }

    /// Drops every cached entry and every in-flight registration
    ///
    /// Computations already running finish, but their results are discarded.
    pub(crate) fn clear(&self) {
        let mut state = lock(&self.state);
        state.entries.clear();
        state.in_flight.clear();
        state.generation = state.generation.wrapping_add(1);
    }

    /// Drops every cached entry, leaving in-flight computations alone
    pub(crate) fn clear_entries(&self) -> usize {
        let mut state = lock(&self.state);
        let dropped = state.entries.len();
        state.entries.clear();
        dropped
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub(crate) fn in_flight_len(&self) -> usize {
        lock(&self.state).in_flight.len()
    }
}

/// Writes a computation's result back and retires its in-flight entry
///
/// Dropped without [`SettleGuard::settle`] (the task panicked or was
/// aborted), it only retires the in-flight entry.
struct SettleGuard<K: Eq + Hash + Clone, V> {
    state: Arc<Mutex<CacheState<K, V>>>,
    key: K,
    generation: u64,
    ttl: Duration,
    settled: bool,
}

impl<K: Eq + Hash + Clone, V> SettleGuard<K, V> {
    fn settle(mut self, value: V) {
        self.settled = true;
        let mut state = lock(&self.state);
        if state.generation == self.generation {
            let entry = CacheEntry::new(value, Instant::now(), self.ttl);
            state.entries.insert(self.key.clone(), entry);
        }
        state.in_flight.complete(&self.key, self.generation);
    }
}

impl<K: Eq + Hash + Clone, V> Drop for SettleGuard<K, V> {
    fn drop(&mut self) {
        if !self.settled {
            lock(&self.state)
                .in_flight
                .complete(&self.key, self.generation);
        }
    }
}
