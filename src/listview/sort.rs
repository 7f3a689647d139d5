//! Sort state and the descending, stable row ordering.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::columns::{ColumnId, ColumnSet};
use crate::core::errors::{QtopError, Result};
use crate::snapshot::EntryKey;

use super::row::RowEntity;

/// Active sort column plus the selector → column map.
///
/// The active column is always one of the mapped columns.
#[derive(Debug, Clone)]
pub struct SortState {
    active: ColumnId,
    selectors: BTreeMap<char, ColumnId>,
}

impl SortState {
    /// Start sorted by the column set's default sort column.
    #[must_use]
    pub fn new(columns: &ColumnSet) -> Self {
        Self {
            active: columns.default_sort().clone(),
            selectors: columns.sort_key_map(),
        }
    }

    #[must_use]
    pub const fn active(&self) -> &ColumnId {
        &self.active
    }

    /// Column bound to `selector`.
    pub fn resolve(&self, selector: char) -> Result<&ColumnId> {
        self.selectors
            .get(&selector)
            .ok_or(QtopError::UnknownSortKey { selector })
    }

    /// Selector bound to `column`, if any.
    #[must_use]
    pub fn selector_for(&self, column: &str) -> Option<char> {
        self.selectors
            .iter()
            .find(|(_, id)| id.as_str() == column)
            .map(|(key, _)| *key)
    }

    /// Make the column behind `selector` active.
    pub fn select(&mut self, selector: char) -> Result<&ColumnId> {
        let column = self.resolve(selector)?.clone();
        self.active = column;
        Ok(&self.active)
    }

    /// Make `column` active by id.
    pub fn select_column(&mut self, column: &str) -> Result<&ColumnId> {
        let selector = self
            .selector_for(column)
            .ok_or_else(|| QtopError::InvalidColumns {
                details: format!("cannot sort by undeclared column {column:?}"),
            })?;
        self.select(selector)
    }

    /// `(selector, column)` pairs, in selector order.
    pub fn bindings(&self) -> impl Iterator<Item = (char, &ColumnId)> {
        self.selectors.iter().map(|(key, id)| (*key, id))
    }
}

/// Reorder `order` by `column`, highest value first.
///
/// The sort is stable: rows with equal values keep their relative order.
/// Keys without a row or a value sort last.
pub fn sort_descending(
    order: &mut [EntryKey],
    rows: &HashMap<EntryKey, RowEntity>,
    column: &str,
) {
    order.sort_by(|a, b| {
        let va = rows.get(a).and_then(|row| row.value(column));
        let vb = rows.get(b).and_then(|row| row.value(column));
        match (va, vb) {
            (Some(va), Some(vb)) => vb.cmp(va),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
