//! Keyed point-in-time snapshots of active plan-cache entries.
//!
//! A [`Snapshot`] maps a stable [`EntryKey`] to a [`Record`] of raw values
//! per column. Snapshots are delivered whole; the list view never sees a
//! partially updated one.

pub mod source;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::columns::{ColumnId, ColumnSet, Value};
use crate::core::errors::{QtopError, Result};

/// Raw values of one entry, keyed by column id.
pub type Record = BTreeMap<ColumnId, Value>;

/// Stable identifier of one monitored entry across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// One complete keyed snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<EntryKey, Record>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_entry<K, I, C, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<EntryKey>,
        I: IntoIterator<Item = (C, V)>,
        C: Into<ColumnId>,
        V: Into<Value>,
    {
        let record = values
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .collect();
        self.entries.insert(key.into(), record);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entries.get(key)
    }

    /// Check that every record carries every declared column.
    ///
    /// A missing column means the snapshot source broke the column schema.
    pub fn validate(&self, columns: &ColumnSet) -> Result<()> {
        for (key, record) in &self.entries {
            if let Some(missing) = columns
                .columns()
                .iter()
                .find(|c| !record.contains_key(c.id.as_str()))
            {
                return Err(QtopError::MissingColumn {
                    key: key.to_string(),
                    column: missing.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Decode a snapshot from a JSON object of objects.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl IntoIterator for Snapshot {
    type Item = (EntryKey, Record);
    type IntoIter = btree_map::IntoIter<EntryKey, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(EntryKey, Record)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (EntryKey, Record)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::format::TextFormat;
    use crate::columns::{ColumnDescriptor, ColumnWidth};

    fn columns() -> ColumnSet {
        ColumnSet::new(
            vec![
                ColumnDescriptor::new("q", "Q", 'Q', ColumnWidth::Weight(1), TextFormat),
                ColumnDescriptor::new("n", "N", 'N', ColumnWidth::Fixed(4), TextFormat),
            ],
            "n",
            "n",
            "q",
        )
        .unwrap()
    }

    #[test]
    fn decodes_json_object_of_objects() {
        let raw = r#"{"A": {"q": "select 1", "n": 5}, "B": {"q": "select 2", "n": 9.5}}"#;
        let snap = Snapshot::from_json_str(raw).unwrap();
        assert_eq!(snap.len(), 2);
        assert!(snap.contains_key("A"));
        assert_eq!(snap.get("B").unwrap().get("n"), Some(&Value::Float(9.5)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = Snapshot::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, QtopError::Serialization { .. }));
    }

    #[test]
    fn validate_accepts_complete_records() {
        let snap = Snapshot::new().with_entry("A", [("q", Value::from("x")), ("n", Value::Int(1))]);
        snap.validate(&columns()).unwrap();
    }

    #[test]
    fn validate_names_the_missing_column() {
        let snap = Snapshot::new().with_entry("A", [("q", Value::from("x"))]);
        let err = snap.validate(&columns()).unwrap_err();
        match err {
            QtopError::MissingColumn { key, column } => {
                assert_eq!(key, "A");
                assert_eq!(column, "n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let snap = Snapshot::new().with_entry(
            "A",
            [
                ("q", Value::from("x")),
                ("n", Value::Int(1)),
                ("plan_id", Value::Int(77)),
            ],
        );
        assert!(snap.validate(&columns()).is_ok());
    }

    #[test]
    fn empty_snapshot_is_valid() {
        assert!(Snapshot::new().validate(&columns()).is_ok());
        assert!(Snapshot::from_json_str("{}").unwrap().is_empty());
    }
}
