//! Range caching with request coalescing
//!
//! - [`RangeCache`]: `(start, lookback)` → [`crate::DateMap`] with TTL, in-flight
//!   coalescing and batched early-stop fetching
//! - [`CacheJanitor`]: periodic wholesale eviction
//! - [`RangeStats`]: how lookups were resolved

mod entry;
mod in_flight;
mod janitor;
mod range;
mod stats;
mod store;

pub use janitor::CacheJanitor;
pub use range::{RangeCache, RangeKey};
pub use stats::RangeStats;
