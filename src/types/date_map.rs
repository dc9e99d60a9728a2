//! Sparse mapping from date to the records observed on that date

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

use super::{DateKey, Record};

/// Sparse date → records mapping
///
/// An absent key means the date was not resolved. A key present with an empty
/// vector means the date was confirmed to hold no data. Range lookups hand out
/// `Arc<DateMap>` so a map is never mutated after it has been cached.
///
/// Iteration is ordered by date. [`DateMap::newest_first`] gives the
/// most-recent-first order that history scans need.
///
/// # Examples
///
/// ```
/// use snapcache::{DateKey, DateMap, Record};
///
/// let mut map = DateMap::new();
/// map.insert("2025-06-25".parse().unwrap(), vec![Record::new("J. Smith", "NYM")]);
/// map.insert("2025-06-29".parse().unwrap(), vec![Record::new("J. Smith", "NYM")]);
///
/// let dates: Vec<String> = map.newest_first().map(|(d, _)| d.to_string()).collect();
/// assert_eq!(dates, ["2025-06-29", "2025-06-25"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateMap(BTreeMap<DateKey, Vec<Record>>);

impl DateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the records for a date, returning any previous value
    pub fn insert(&mut self, date: DateKey, records: Vec<Record>) -> Option<Vec<Record>> {
        self.0.insert(date, records)
    }

    pub fn get(&self, date: &DateKey) -> Option<&[Record]> {
        self.0.get(date).map(Vec::as_slice)
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        self.0.contains_key(date)
    }

    /// Number of resolved dates (including confirmed-empty ones)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of dates that hold at least one record
    pub fn dates_with_data(&self) -> usize {
        self.0.values().filter(|records| !records.is_empty()).count()
    }

    /// Total number of records across all dates
    pub fn record_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Oldest-first iteration
    pub fn iter(&self) -> btree_map::Iter<'_, DateKey, Vec<Record>> {
        self.0.iter()
    }

    /// Most-recent-first iteration
    pub fn newest_first(&self) -> impl Iterator<Item = (&DateKey, &[Record])> {
        self.0
            .iter()
            .rev()
            .map(|(date, records)| (date, records.as_slice()))
    }

    pub fn newest(&self) -> Option<DateKey> {
        self.0.keys().next_back().copied()
    }

    pub fn oldest(&self) -> Option<DateKey> {
        self.0.keys().next().copied()
    }
}

impl FromIterator<(DateKey, Vec<Record>)> for DateMap {
    fn from_iter<I: IntoIterator<Item = (DateKey, Vec<Record>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DateMap {
    type Item = (&'a DateKey, &'a Vec<Record>);
    type IntoIter = btree_map::Iter<'a, DateKey, Vec<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn confirmed_empty_is_distinct_from_absent() {
        let mut map = DateMap::new();
        map.insert(key("2025-06-01"), Vec::new());

        assert!(map.contains(&key("2025-06-01")));
        assert_eq!(map.get(&key("2025-06-01")), Some(&[][..]));
        assert!(map.get(&key("2025-06-02")).is_none());
        assert_eq!(map.len(), 1);
        assert_eq!(map.dates_with_data(), 0);
    }

    #[test]
    fn bounds_and_counts() {
        let map: DateMap = [
            (key("2025-06-25"), vec![Record::new("a", "x")]),
            (key("2025-06-29"), vec![Record::new("a", "x"), Record::new("b", "y")]),
            (key("2025-06-27"), vec![]),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.newest(), Some(key("2025-06-29")));
        assert_eq!(map.oldest(), Some(key("2025-06-25")));
        assert_eq!(map.record_count(), 3);
        assert_eq!(map.dates_with_data(), 2);
    }

    #[test]
    fn serializes_as_object_keyed_by_date() {
        let mut map = DateMap::new();
        map.insert(key("2025-06-29"), vec![Record::new("J. Smith", "NYM")]);

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "2025-06-29": [{ "name": "J. Smith", "team": "NYM" }] })
        );

        let back: DateMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }
}
