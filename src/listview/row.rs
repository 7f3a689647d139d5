//! Row entity: one monitored entry's raw values and their rendered cells.

use crate::columns::{ColorClass, ColumnSet, Value};
use crate::core::errors::{QtopError, Result};
use crate::snapshot::{EntryKey, Record};

/// Identity of a row entity, assigned once at creation and never reused
/// within a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub(crate) u64);

impl RowId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Formatted text and color class of one column of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub class: ColorClass,
}

/// A displayed row.
///
/// `cells` is always the image of `values` under the column set the row was
/// last created or updated with: both are replaced together.
#[derive(Debug)]
pub struct RowEntity {
    id: RowId,
    key: EntryKey,
    values: Record,
    cells: Vec<Cell>,
}

impl RowEntity {
    /// Render every column of `record`. Fails if a declared column is absent.
    pub fn create(id: RowId, columns: &ColumnSet, key: EntryKey, record: Record) -> Result<Self> {
        let cells = render_cells(columns, &key, &record)?;
        Ok(Self {
            id,
            key,
            values: record,
            cells,
        })
    }

    /// Replace the values and re-render every cell in place.
    ///
    /// On error the row is left exactly as it was.
    pub fn update(&mut self, columns: &ColumnSet, record: Record) -> Result<()> {
        let cells = render_cells(columns, &self.key, &record)?;
        self.cells = cells;
        self.values = record;
        Ok(())
    }

    #[must_use]
    pub const fn id(&self) -> RowId {
        self.id
    }

    #[must_use]
    pub const fn key(&self) -> &EntryKey {
        &self.key
    }

    /// Raw value of a column.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Rendered cells in column order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

fn render_cells(columns: &ColumnSet, key: &EntryKey, record: &Record) -> Result<Vec<Cell>> {
    columns
        .columns()
        .iter()
        .map(|column| {
            let value = record
                .get(column.id.as_str())
                .ok_or_else(|| QtopError::MissingColumn {
                    key: key.to_string(),
                    column: column.id.to_string(),
                })?;
            Ok(Cell {
                text: column.format.format(value),
                class: column.format.classify(value),
            })
        })
        .collect()
}
