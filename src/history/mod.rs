//! Per-entity history lookups over a resolved [`crate::DateMap`]

mod index;

pub use index::{EntityHistoryIndex, HistoryEntry, HistoryResult};
