// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Memoized "most recent K occurrences" lookup for one entity

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

use crate::errors::HistoryError;
use crate::tracing::spans;
use crate::types::{DateKey, DateMap, Record};

/// One occurrence of an entity: the matching record and the date it was seen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub record: Record,
    pub date: DateKey,
}

/// Newest-first occurrences of one entity, at most one per date
///
/// # Examples
///
/// ```
/// use snapcache::{DateMap, EntityHistoryIndex, Record};
///
/// let map: DateMap = [
///     ("2025-06-25".parse().unwrap(), vec![Record::new("J. Smith", "NYM")]),
///     ("2025-06-29".parse().unwrap(), vec![Record::new("J. Smith", "NYM")]),
/// ]
/// .into_iter()
/// .collect();
///
/// let index = EntityHistoryIndex::new();
/// let history = index.find_recent("J. Smith", "NYM", &map, 3).unwrap();
/// let dates: Vec<String> = history.dates().map(|d| d.to_string()).collect();
/// assert_eq!(dates, ["2025-06-29", "2025-06-25"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryResult(Vec<HistoryEntry>);

impl HistoryResult {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.0.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.0.iter().map(|entry| entry.date)
    }

    pub fn most_recent(&self) -> Option<&HistoryEntry> {
        self.0.first()
    }
}

impl<'a> IntoIterator for &'a HistoryResult {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntityKey {
    entity_name: String,
    entity_group: String,
    limit: usize,
}

/// Memoizes per-entity history scans
///
/// Results are keyed by `(entity_name, entity_group, limit)` only, not by the
/// map that was scanned: once an entity has been looked up, later lookups
/// return the memoized result until [`EntityHistoryIndex::clear`].
#[derive(Debug, Default)]
pub struct EntityHistoryIndex {
    memo: Mutex<HashMap<EntityKey, Arc<HistoryResult>>>,
}

impl EntityHistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn memo(&self) -> MutexGuard<'_, HashMap<EntityKey, Arc<HistoryResult>>> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns up to `limit` most recent occurrences of the entity in `date_map`
    ///
    /// An empty map yields an empty result and is not memoized. Fewer
    /// occurrences than `limit` yield a shorter result.
    ///
    /// # Errors
    ///
    /// [`HistoryError::InvalidArgument`] when `limit` is zero or
    /// `entity_name` is empty.
    pub fn find_recent(
        &self,
        entity_name: &str,
        entity_group: &str,
        date_map: &DateMap,
        limit: usize,
    ) -> Result<Arc<HistoryResult>, HistoryError> {
        let span = spans::find_recent(entity_name, entity_group, limit);
        let _guard = span.enter();

        validate(entity_name, limit)?;

        if date_map.is_empty() {
            return Ok(Arc::new(HistoryResult::default()));
        }

        let key = EntityKey {
            entity_name: entity_name.to_owned(),
            entity_group: entity_group.to_owned(),
            limit,
        };

        if let Some(result) = self.memo().get(&key) {
            trace!(entries = result.len(), "History memo hit");
            return Ok(Arc::clone(result));
        }

        let result = Arc::new(scan(entity_name, entity_group, date_map, limit));
        trace!(entries = result.len(), "History scanned");

        // A concurrent lookup may have filled the slot while we scanned
        Ok(Arc::clone(self.memo().entry(key).or_insert(result)))
    }

    /// Returns the single most recent occurrence, without memoizing
    pub fn find_most_recent(
        &self,
        entity_name: &str,
        entity_group: &str,
        date_map: &DateMap,
    ) -> Result<Option<HistoryEntry>, HistoryError> {
        validate(entity_name, 1)?;
        Ok(scan(entity_name, entity_group, date_map, 1).0.pop())
    }

    pub fn clear(&self) {
        self.memo().clear();
    }

    /// Number of memoized results
    pub fn len(&self) -> usize {
        self.memo().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate(entity_name: &str, limit: usize) -> Result<(), HistoryError> {
    if limit == 0 {
        return Err(HistoryError::invalid_argument(
            "limit",
            "must be at least 1",
        ));
    }
    if entity_name.is_empty() {
        return Err(HistoryError::invalid_argument(
            "entity_name",
            "must not be empty",
        ));
    }
    Ok(())
}

fn scan(entity_name: &str, entity_group: &str, date_map: &DateMap, limit: usize) -> HistoryResult {
    let entries = date_map
        .newest_first()
        .filter_map(|(date, records)| {
            records
                .iter()
                .find(|record| record.matches(entity_name, entity_group))
                .map(|record| HistoryEntry {
                    record: record.clone(),
                    date: *date,
                })
        })
        .take(limit)
        .collect();
    HistoryResult(entries)
}
