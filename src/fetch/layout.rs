//! Mapping from dates to snapshot addresses

use std::fmt;

use crate::config::constants::layout::{DEFAULT_ROOT, MONTH_NAMES};
use crate::types::DateKey;

/// Builds the address a date's snapshot is published under
pub trait SnapshotLayout: Send + Sync + fmt::Debug {
    fn address(&self, date: DateKey) -> String;
}

/// One JSON file per day, grouped by year and month name
///
/// `2025-07-01` lives at `{root}/2025/july/july_01_2025.json`.
///
/// # Examples
///
/// ```
/// use snapcache::{MonthlyJsonLayout, SnapshotLayout};
///
/// let layout = MonthlyJsonLayout::default();
/// assert_eq!(
///     layout.address("2025-07-01".parse().unwrap()),
///     "/data/2025/july/july_01_2025.json"
/// );
///
/// let layout = MonthlyJsonLayout::new("snapshots/");
/// assert_eq!(
///     layout.address("2024-10-15".parse().unwrap()),
///     "snapshots/2024/october/october_15_2024.json"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MonthlyJsonLayout {
    root: String,
}

impl MonthlyJsonLayout {
    /// Creates a layout rooted at `root`; a trailing slash is ignored
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.len() > 1 && root.ends_with('/') {
            root.pop();
        }
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }
}

impl Default for MonthlyJsonLayout {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl SnapshotLayout for MonthlyJsonLayout {
    fn address(&self, date: DateKey) -> String {
        // month() is always 1..=12
        let month = MONTH_NAMES[(date.month() - 1) as usize];
        let year = date.year();
        let day = date.day();
        let root = self.root.trim_end_matches('/');
        format!("{root}/{year}/{month}/{month}_{day:02}_{year}.json")
    }
}
