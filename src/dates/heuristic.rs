// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Candidate date filtering
//!
//! Most dates in the dataset hold nothing: future dates, and anything outside
//! the yearly season. [`DateHeuristic`] rejects those before any fetch is
//! issued, so a year-long lookback turns into a few hundred plausible dates.
//!
//! # Examples
//!
//! ```
//! use snapcache::{CandidateCap, DateHeuristic, DateKey};
//!
//! let heuristic = DateHeuristic::default(); // March 20 through October 31
//! let today: DateKey = "2025-07-15".parse().unwrap();
//!
//! assert!(heuristic.is_candidate("2025-07-01".parse().unwrap(), today));
//! assert!(!heuristic.is_candidate("2025-07-16".parse().unwrap(), today)); // future
//! assert!(!heuristic.is_candidate("2025-01-10".parse().unwrap(), today)); // off-season
//!
//! let candidates = heuristic.generate_candidates(
//!     "2025-07-01".parse().unwrap(),
//!     14,
//!     CandidateCap::DEFAULT,
//!     today,
//! );
//! assert_eq!(candidates.len(), 14);
//! assert_eq!(candidates[0].to_string(), "2025-07-01");
//! assert_eq!(candidates[13].to_string(), "2025-06-18");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConfigError;
use crate::types::{CandidateCap, DateKey};

/// Leap year used to validate month/day pairs, so February 29 is accepted
const REFERENCE_LEAP_YEAR: i32 = 2000;

/// Where a date falls relative to its year's season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeasonPosition {
    Before,
    Inside,
    After,
}

/// Inclusive per-year window of month/day pairs in which data is published
///
/// Windows may not wrap around the new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    start: (u32, u32),
    end: (u32, u32),
}

impl SeasonWindow {
    /// Creates a window from `(month, day)` bounds, both inclusive
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeasonWindow`] if either bound is not a
    /// calendar day or the window ends before it starts.
    pub fn new(start: (u32, u32), end: (u32, u32)) -> Result<Self, ConfigError> {
        for (label, (month, day)) in [("start", start), ("end", end)] {
            if NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).is_none() {
                return Err(ConfigError::invalid_season_window(format!(
                    "{label} {month:02}-{day:02} is not a calendar day"
                )));
            }
        }
        if end < start {
            return Err(ConfigError::invalid_season_window(format!(
                "end {:02}-{:02} precedes start {:02}-{:02}",
                end.0, end.1, start.0, start.1
            )));
        }
        Ok(Self { start, end })
    }

    /// A window covering the whole year
    pub const fn all_year() -> Self {
        Self {
            start: (1, 1),
            end: (12, 31),
        }
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.position(date) == SeasonPosition::Inside
    }

    fn position(&self, date: DateKey) -> SeasonPosition {
        let month_day = (date.month(), date.day());
        if month_day < self.start {
            SeasonPosition::Before
        } else if month_day > self.end {
            SeasonPosition::After
        } else {
            SeasonPosition::Inside
        }
    }

    /// Last in-season day of `year`, clamped for February 29 in common years
    fn last_day_in(&self, year: i32) -> Option<DateKey> {
        let (month, day) = self.end;
        (0..=1)
            .find_map(|back| NaiveDate::from_ymd_opt(year, month, day - back))
            .map(DateKey::new)
    }
}

impl Default for SeasonWindow {
    /// March 20 through October 31
    fn default() -> Self {
        Self {
            start: (3, 20),
            end: (10, 31),
        }
    }
}

impl fmt::Display for SeasonWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:02}..={:02}-{:02}",
            self.start.0, self.start.1, self.end.0, self.end.1
        )
    }
}

/// Decides which dates are worth fetching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateHeuristic {
    season: SeasonWindow,
}

impl DateHeuristic {
    pub const fn new(season: SeasonWindow) -> Self {
        Self { season }
    }

    pub const fn season(&self) -> SeasonWindow {
        self.season
    }

    /// Returns true if `date` is not after `today` and falls inside the season
    pub fn is_candidate(&self, date: DateKey, today: DateKey) -> bool {
        date <= today && self.season.contains(date)
    }

    /// Walks backward from `start` over at most `max_days` days (offsets
    /// `0..max_days`), keeping candidates until `cap` are collected
    ///
    /// The result is strictly descending: most recent first.
    ///
    /// Runs of rejected dates (the future, the off-season) are skipped in one
    /// step rather than day by day; the output is the same as a day-by-day walk.
    pub fn generate_candidates(
        &self,
        start: DateKey,
        max_days: u32,
        cap: CandidateCap,
        today: DateKey,
    ) -> Vec<DateKey> {
        let cap = cap.as_usize();
        let mut candidates = Vec::new();
        if max_days == 0 || cap == 0 {
            return candidates;
        }

        // Earliest date the walk may reach. Saturates at chrono's lower bound.
        let earliest = start
            .checked_sub_days(max_days - 1)
            .unwrap_or(DateKey::new(NaiveDate::MIN));

        let mut cursor = Some(start);
        while let Some(date) = cursor {
            if date < earliest || candidates.len() >= cap {
                break;
            }

            if date > today {
                cursor = Some(today);
                continue;
            }

            cursor = match self.season.position(date) {
                SeasonPosition::Inside => {
                    candidates.push(date);
                    date.pred()
                }
                SeasonPosition::After => self.season.last_day_in(date.year()),
                SeasonPosition::Before => date
                    .year()
                    .checked_sub(1)
                    .and_then(|year| self.season.last_day_in(year)),
            };
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    /// Day-by-day reference walk used to check the skipping implementation
    fn naive_candidates(
        heuristic: &DateHeuristic,
        start: DateKey,
        max_days: u32,
        cap: usize,
        today: DateKey,
    ) -> Vec<DateKey> {
        let mut out = Vec::new();
        for offset in 0..max_days {
            if out.len() >= cap {
                break;
            }
            let Some(date) = start.checked_sub_days(offset) else {
                break;
            };
            if heuristic.is_candidate(date, today) {
                out.push(date);
            }
        }
        out
    }

    #[test]
    fn season_window_validation() {
        assert!(SeasonWindow::new((3, 20), (10, 31)).is_ok());
        assert!(SeasonWindow::new((2, 29), (12, 31)).is_ok());
        assert!(SeasonWindow::new((2, 30), (12, 31)).is_err());
        assert!(SeasonWindow::new((13, 1), (12, 31)).is_err());
        assert!(SeasonWindow::new((10, 31), (3, 20)).is_err());
    }

    #[test]
    fn season_bounds_are_inclusive() {
        let season = SeasonWindow::default();
        assert!(season.contains(key("2025-03-20")));
        assert!(season.contains(key("2025-10-31")));
        assert!(!season.contains(key("2025-03-19")));
        assert!(!season.contains(key("2025-11-01")));
    }

    #[test]
    fn future_dates_are_rejected() {
        let heuristic = DateHeuristic::default();
        let today = key("2025-07-15");
        assert!(heuristic.is_candidate(today, today));
        assert!(!heuristic.is_candidate(key("2025-07-16"), today));
    }

    #[test]
    fn zero_days_or_cap_yields_nothing() {
        let heuristic = DateHeuristic::default();
        let start = key("2025-07-01");
        assert!(heuristic
            .generate_candidates(start, 0, CandidateCap::DEFAULT, start)
            .is_empty());
        assert!(heuristic
            .generate_candidates(start, 30, CandidateCap::new(0), start)
            .is_empty());
    }

    #[test]
    fn walk_crosses_the_off_season() {
        let heuristic = DateHeuristic::default();
        let today = key("2025-04-05");
        let candidates =
            heuristic.generate_candidates(key("2025-04-01"), 400, CandidateCap::new(20), today);

        assert_eq!(candidates.len(), 20);
        assert_eq!(candidates[0], key("2025-04-01"));
        assert_eq!(candidates[12], key("2025-03-20"));
        // Next in-season day after 2025-03-20 is the previous October 31
        assert_eq!(candidates[13], key("2024-10-31"));
    }

    #[test]
    fn start_in_the_future_begins_at_today() {
        let heuristic = DateHeuristic::default();
        let today = key("2025-07-15");
        let candidates =
            heuristic.generate_candidates(key("2025-07-20"), 10, CandidateCap::DEFAULT, today);

        // Offsets 0..10 reach back to 2025-07-11, of which 07-15..07-11 are not future
        assert_eq!(candidates.first(), Some(&today));
        assert_eq!(candidates.last(), Some(&key("2025-07-11")));
        assert_eq!(candidates.len(), 5);
    }

    #[test]
    fn skipping_walk_matches_day_by_day_walk() {
        let heuristics = [
            DateHeuristic::default(),
            DateHeuristic::new(SeasonWindow::all_year()),
            DateHeuristic::new(SeasonWindow::new((2, 29), (2, 29)).unwrap()),
        ];
        let starts = ["2025-07-01", "2024-03-01", "2025-12-25", "2026-02-28"];
        let todays = ["2025-07-15", "2024-02-01", "2026-01-01"];

        for heuristic in &heuristics {
            for start in starts {
                for today in todays {
                    for (max_days, cap) in [(1, 500), (14, 500), (400, 50), (2000, 500)] {
                        let expected =
                            naive_candidates(heuristic, key(start), max_days, cap, key(today));
                        let actual = heuristic.generate_candidates(
                            key(start),
                            max_days,
                            CandidateCap::new(cap),
                            key(today),
                        );
                        assert_eq!(
                            actual, expected,
                            "season={} start={start} today={today} max_days={max_days} cap={cap}",
                            heuristic.season()
                        );
                    }
                }
            }
        }
    }
}
