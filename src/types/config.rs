//! Strong types for configuration values
//!
//! These types keep the three counts that shape a range fetch (batch width,
//! candidate cap, early-stop threshold) from being confused with each other or
//! with day counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::slice::Chunks;

use super::DateKey;

/// Number of dates fetched concurrently within one batch
///
/// Bounds the number of outstanding fetches at any moment.
///
/// # Examples
///
/// ```
/// use snapcache::{BatchSize, DateKey};
///
/// let size = BatchSize::new(10);
/// let dates: Vec<DateKey> = (0..25)
///     .map(|n| DateKey::from_ymd(2025, 7, 1).unwrap().checked_sub_days(n).unwrap())
///     .collect();
///
/// let batches: Vec<_> = size.batches(&dates).collect();
/// assert_eq!(batches.len(), 3);
/// assert_eq!(batches[2].len(), 5);
/// assert_eq!(size.batches_needed(25), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchSize(usize);

impl BatchSize {
    pub const DEFAULT: Self = Self(10);

    pub const fn new(size: usize) -> Self {
        Self(size)
    }

    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Number of batches needed to cover `total` candidates
    pub fn batches_needed(&self, total: usize) -> usize {
        if self.0 == 0 {
            return 0;
        }
        total.div_ceil(self.0)
    }

    /// Splits candidates into consecutive batches, preserving order
    ///
    /// A zero size is treated as one, so the iterator always makes progress.
    pub fn batches<'a>(&self, candidates: &'a [DateKey]) -> Chunks<'a, DateKey> {
        candidates.chunks(self.0.max(1))
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dates", self.0)
    }
}

/// Upper bound on the number of candidate dates generated for one range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateCap(usize);

impl CandidateCap {
    pub const DEFAULT: Self = Self(500);

    pub const fn new(cap: usize) -> Self {
        Self(cap)
    }

    pub const fn as_usize(&self) -> usize {
        self.0
    }
}

impl Default for CandidateCap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CandidateCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} candidates", self.0)
    }
}

/// Number of dates-with-data after which a range fetch stops early
///
/// # Examples
///
/// ```
/// use snapcache::EarlyStopThreshold;
///
/// let threshold = EarlyStopThreshold::new(30);
/// assert!(!threshold.is_met(29));
/// assert!(threshold.is_met(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EarlyStopThreshold(usize);

impl EarlyStopThreshold {
    pub const DEFAULT: Self = Self(30);

    pub const fn new(threshold: usize) -> Self {
        Self(threshold)
    }

    pub const fn as_usize(&self) -> usize {
        self.0
    }

    pub fn is_met(&self, dates_with_data: usize) -> bool {
        dates_with_data >= self.0
    }
}

impl Default for EarlyStopThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for EarlyStopThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dates with data", self.0)
    }
}
