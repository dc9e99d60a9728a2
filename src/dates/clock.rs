//! Source of "today" for candidate filtering
//!
//! The heuristic is a pure function of `(date, today)`. The range cache asks a
//! [`Clock`] for `today` once per computation so tests can pin it.

use std::fmt;

use chrono::Local;

use crate::types::DateKey;

/// Provides the current calendar date
pub trait Clock: Send + Sync + fmt::Debug {
    fn today(&self) -> DateKey;
}

/// Reads the local calendar date from the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        DateKey::new(Local::now().date_naive())
    }
}

/// Always reports the same date
///
/// # Examples
///
/// ```
/// use snapcache::{Clock, FixedClock};
///
/// let clock = FixedClock::new("2025-07-15".parse().unwrap());
/// assert_eq!(clock.today().to_string(), "2025-07-15");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateKey);

impl FixedClock {
    pub const fn new(today: DateKey) -> Self {
        Self(today)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.0
    }
}
