//! Per-date snapshot records
//!
//! Only the identity fields are modeled. Everything else in a record is kept
//! verbatim in an ordered JSON field bag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entity's entry in a daily snapshot
///
/// Identity is the pair `(entity_name, entity_group)`. On the wire the pair is
/// carried as the `name` and `team` fields.
///
/// # Examples
///
/// ```
/// use snapcache::Record;
/// use serde_json::json;
///
/// let record = Record::new("J. Smith", "NYM").with_field("H", json!(2));
/// assert!(record.matches("J. Smith", "NYM"));
/// assert!(!record.matches("J. Smith", "BOS"));
/// assert_eq!(record.field("H"), Some(&json!(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "name")]
    entity_name: String,
    #[serde(rename = "team")]
    entity_group: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(entity_name: impl Into<String>, entity_group: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            entity_group: entity_group.into(),
            fields: Map::new(),
        }
    }

    /// Adds or replaces a field in the record's field bag
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn entity_group(&self) -> &str {
        &self.entity_group
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns true when this record belongs to the given entity
    pub fn matches(&self, entity_name: &str, entity_group: &str) -> bool {
        self.entity_name == entity_name && self.entity_group == entity_group
    }
}
