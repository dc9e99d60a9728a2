//! Registry of computations that are currently running
//!
//! Late joiners attach to the registered [`SharedComputation`] instead of
//! starting duplicate work. Entries are tagged with the cache generation they
//! were registered under so a computation that outlives a `clear` cannot
//! remove its successor.

use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::hash::Hash;

/// A pending computation every caller for the same key can await
pub(crate) type SharedComputation<V> = Shared<BoxFuture<'static, V>>;

struct InFlight<V> {
    generation: u64,
    computation: SharedComputation<V>,
}

pub(crate) struct InFlightTable<K, V> {
    entries: HashMap<K, InFlight<V>>,
}

impl<K: Eq + Hash, V> InFlightTable<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<SharedComputation<V>> {
        self.entries
            .get(key)
            .map(|in_flight| in_flight.computation.clone())
    }

    pub(crate) fn insert(&mut self, key: K, generation: u64, computation: SharedComputation<V>) {
        self.entries.insert(
            key,
            InFlight {
                generation,
                computation,
            },
        );
    }

    /// Removes `key` if it is still registered under `generation`
    ///
    /// Returns true when an entry was removed.
    pub(crate) fn complete(&mut self, key: &K, generation: u64) -> bool {
        match self.entries.get(key) {
            Some(in_flight) if in_flight.generation == generation => {
                self.entries.remove(key);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
