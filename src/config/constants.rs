//! Defaults and wire constants
//!
//! This module centralizes the tuning constants and snapshot layout strings
//! used throughout the snapcache crate.

use std::time::Duration;

/// How long a resolved range stays fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// Interval between wholesale range-cache sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Per-date fetch timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Lookback window used when callers don't pick one
pub const DEFAULT_LOOKBACK_DAYS: u32 = 180;

/// Default history length for entity lookups
pub const DEFAULT_HISTORY_LENGTH: usize = 3;

/// Snapshot layout strings
pub mod layout {
    /// Root directory of the default monthly layout
    pub const DEFAULT_ROOT: &str = "/data";

    /// Top-level payload field holding the record array
    pub const RECORDS_FIELD: &str = "players";

    /// Lowercase English month names, January first
    pub const MONTH_NAMES: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
}
