// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical calendar-date key
//!
//! [`DateKey`] wraps a [`chrono::NaiveDate`] and renders as `YYYY-MM-DD`.
//! Because the rendering is fixed-width and zero-padded, chronological order,
//! `Ord` on the key and lexical order of the string all agree.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DateKeyError;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date used as a map and cache key
///
/// # Examples
///
/// ```
/// use snapcache::DateKey;
///
/// let key: DateKey = "2025-07-01".parse().unwrap();
/// assert_eq!(key.to_string(), "2025-07-01");
/// assert_eq!(key.pred().unwrap().to_string(), "2025-06-30");
/// assert!(key > "2025-06-30".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Wraps a chrono date
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Creates a key from year, month and day, or `None` for an impossible date
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The previous calendar day, or `None` at the start of chrono's range
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The date `days` days earlier, or `None` if that underflows
    pub fn checked_sub_days(&self, days: u32) -> Option<Self> {
        self.0.checked_sub_days(Days::new(u64::from(days))).map(Self)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<DateKey> for NaiveDate {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|source| DateKeyError {
                input: s.to_string(),
                source,
            })
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}
