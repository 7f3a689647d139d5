//! Column metadata: identifiers, widths, sort selectors and per-column
//! formatting capabilities.
//!
//! A [`ColumnSet`] is immutable for the lifetime of a dashboard. It names the
//! default and alternate sort columns and the column whose value identifies a
//! row when the user selects it.

pub mod format;
pub mod plancache;
pub mod value;

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{QtopError, Result};

pub use format::{ColorClass, ColumnFormat};
pub use value::Value;

/// Stable column identifier (the key used in snapshot records).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ColumnId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Horizontal sizing of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Exactly this many terminal cells.
    Fixed(u16),
    /// Share of the space left over after fixed columns.
    Weight(u16),
}

/// One column of the list view.
#[derive(Debug)]
pub struct ColumnDescriptor {
    pub id: ColumnId,
    pub title: String,
    pub sort_key: char,
    pub width: ColumnWidth,
    pub format: Box<dyn ColumnFormat>,
}

impl ColumnDescriptor {
    #[must_use]
    pub fn new(
        id: &str,
        title: &str,
        sort_key: char,
        width: ColumnWidth,
        format: impl ColumnFormat + 'static,
    ) -> Self {
        Self {
            id: ColumnId::from(id),
            title: title.to_owned(),
            sort_key,
            width,
            format: Box::new(format),
        }
    }
}

/// Ordered, validated set of columns plus the designated sort and focus
/// columns.
#[derive(Debug)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
    default_sort: ColumnId,
    alternate_sort: ColumnId,
    focus_column: ColumnId,
}

impl ColumnSet {
    /// Build a column set.
    ///
    /// Column ids and sort selectors must be unique, and the three designated
    /// columns must exist.
    pub fn new(
        columns: Vec<ColumnDescriptor>,
        default_sort: &str,
        alternate_sort: &str,
        focus_column: &str,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(QtopError::InvalidColumns {
                details: "at least one column is required".to_string(),
            });
        }

        let mut ids = HashSet::new();
        let mut selectors = HashSet::new();
        for column in &columns {
            if !ids.insert(column.id.as_str()) {
                return Err(QtopError::InvalidColumns {
                    details: format!("duplicate column id {:?}", column.id.as_str()),
                });
            }
            if !selectors.insert(column.sort_key) {
                return Err(QtopError::InvalidColumns {
                    details: format!(
                        "sort key {:?} is bound to more than one column",
                        column.sort_key
                    ),
                });
            }
        }

        for (role, id) in [
            ("default sort", default_sort),
            ("alternate sort", alternate_sort),
            ("focus", focus_column),
        ] {
            if !ids.contains(id) {
                return Err(QtopError::InvalidColumns {
                    details: format!("{role} column {id:?} is not declared"),
                });
            }
        }

        Ok(Self {
            default_sort: ColumnId::from(default_sort),
            alternate_sort: ColumnId::from(alternate_sort),
            focus_column: ColumnId::from(focus_column),
            columns,
        })
    }

    /// Columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.id.as_str() == id)
    }

    #[must_use]
    pub fn default_sort(&self) -> &ColumnId {
        &self.default_sort
    }

    #[must_use]
    pub fn alternate_sort(&self) -> &ColumnId {
        &self.alternate_sort
    }

    /// Column whose raw value identifies a row on selection.
    #[must_use]
    pub fn focus_column(&self) -> &ColumnId {
        &self.focus_column
    }

    /// Selector → column mapping for every column.
    #[must_use]
    pub fn sort_key_map(&self) -> BTreeMap<char, ColumnId> {
        self.columns
            .iter()
            .map(|c| (c.sort_key, c.id.clone()))
            .collect()
    }
}
