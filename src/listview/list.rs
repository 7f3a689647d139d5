//! The live list view: reconciles snapshots into row entities, keeps them
//! sorted, and owns the viewport.
//!
//! Every mutation is synchronous and happens on the caller's thread. Rows are
//! never handed out mutably; the only state a render pass changes is the
//! viewport.

use std::collections::HashMap;

use crate::columns::{ColumnId, ColumnSet, Value};
use crate::core::errors::{QtopError, Result};
use crate::snapshot::{EntryKey, Snapshot};

use super::events::{EventSink, ListEvent};
use super::frame::{self, Frame};
use super::row::{RowEntity, RowId};
use super::sort::{self, SortState};
use super::viewport::{Nav, ViewportState};

/// What one reconcile pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// Whether the collection was empty after stale rows were dropped and
    /// before new rows were inserted.
    pub was_empty: bool,
}

/// Input the list understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListInput {
    /// Select the focused row.
    Activate,
    /// Sort by the column bound to this selector.
    ChangeSort(char),
    /// Switch between the default and alternate sort columns.
    ToggleSort,
    Navigate(Nav),
}

/// Result of [`QueryList::handle_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    /// Not consumed; the caller routes it elsewhere (navigation goes to
    /// [`QueryList::scroll`]).
    Unhandled(ListInput),
}

/// Keyed, sorted, scrollable collection of query rows.
#[derive(Debug)]
pub struct QueryList {
    columns: ColumnSet,
    rows: HashMap<EntryKey, RowEntity>,
    order: Vec<EntryKey>,
    sort: SortState,
    viewport: ViewportState,
    follow_bottom: bool,
    next_row_id: u64,
}

impl QueryList {
    /// Empty list sorted by the column set's default sort column, with
    /// auto-follow enabled.
    #[must_use]
    pub fn new(columns: ColumnSet) -> Self {
        Self {
            sort: SortState::new(&columns),
            columns,
            rows: HashMap::new(),
            order: Vec::new(),
            viewport: ViewportState::default(),
            follow_bottom: true,
            next_row_id: 0,
        }
    }

    /// Turn auto-follow on or off.
    #[must_use]
    pub fn with_follow_bottom(mut self, follow: bool) -> Self {
        self.follow_bottom = follow;
        self
    }

    /// Start sorted by `column` instead of the default sort column.
    pub fn with_sort_column(mut self, column: &str) -> Result<Self> {
        self.sort.select_column(column)?;
        Ok(self)
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = &RowEntity> {
        self.order.iter().filter_map(|key| self.rows.get(key))
    }

    /// Keys in display order.
    #[must_use]
    pub fn keys(&self) -> &[EntryKey] {
        &self.order
    }

    #[must_use]
    pub fn row(&self, key: &str) -> Option<&RowEntity> {
        self.rows.get(key)
    }

    /// Focused position in display order, `None` when empty.
    #[must_use]
    pub fn focus(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.viewport.focus())
    }

    #[must_use]
    pub fn focused_row(&self) -> Option<&RowEntity> {
        let key = self.order.get(self.focus()?)?;
        self.rows.get(key)
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Active sort column.
    #[must_use]
    pub fn sort_column(&self) -> &ColumnId {
        self.sort.active()
    }

    /// Every valid sort selector with its column.
    pub fn sort_keys(&self) -> impl Iterator<Item = (char, &ColumnId)> {
        self.sort.bindings()
    }

    /// Make the list mirror `snapshot`.
    ///
    /// Rows whose key survives keep their identity and are updated in place;
    /// rows whose key vanished are dropped; new keys get new rows. Focus stays
    /// on the same row through the re-sort; if that row vanished, focus moves
    /// to the next surviving row (the last one at the end of the list). If any
    /// record lacks a declared column, nothing changes and the violation is
    /// returned.
    pub fn update_entries(&mut self, snapshot: Snapshot) -> Result<ReconcileReport> {
        snapshot.validate(&self.columns)?;

        let before = self.order.len();
        // Rows removed above the focused one pull focus up with them.
        let focus = self.viewport.focus().min(before.saturating_sub(1));
        let removed_above = self.order[..focus]
            .iter()
            .filter(|key| !snapshot.contains_key(key.as_str()))
            .count();
        self.order.retain(|key| snapshot.contains_key(key.as_str()));
        self.rows.retain(|key, _| snapshot.contains_key(key.as_str()));
        let mut report = ReconcileReport {
            removed: before - self.order.len(),
            was_empty: self.order.is_empty(),
            ..ReconcileReport::default()
        };

        let anchor = self
            .order
            .len()
            .checked_sub(1)
            .map(|last| self.order[(focus - removed_above).min(last)].clone());

        for (key, record) in snapshot {
            if let Some(row) = self.rows.get_mut(key.as_str()) {
                row.update(&self.columns, record)?;
                report.updated += 1;
            } else {
                let id = RowId(self.next_row_id);
                self.next_row_id += 1;
                let row = RowEntity::create(id, &self.columns, key.clone(), record)?;
                self.rows.insert(key.clone(), row);
                self.order.push(key);
                report.added += 1;
            }
        }

        self.resort();
        if report.was_empty && !self.order.is_empty() {
            self.viewport.reset_to_top();
        } else {
            if let Some(index) = anchor.and_then(|key| self.position(&key)) {
                self.viewport.set_focus(index);
            }
            self.viewport.clamp(self.order.len());
        }
        Ok(report)
    }

    /// Sort by the column bound to `selector`, focus the top row and emit
    /// [`ListEvent::SortColumnChanged`].
    ///
    /// An unknown selector changes nothing and is returned as an error.
    pub fn update_sort_column(&mut self, selector: char, sink: &mut impl EventSink) -> Result<()> {
        let column = self.sort.select(selector)?.clone();
        self.resort();
        self.viewport.reset_to_top();
        sink.emit(ListEvent::SortColumnChanged(column))
    }

    /// Flip between the default and alternate sort columns.
    pub fn toggle_sort(&mut self, sink: &mut impl EventSink) -> Result<()> {
        let target = if self.sort.active() == self.columns.default_sort() {
            self.columns.alternate_sort()
        } else {
            self.columns.default_sort()
        };
        let selector = self
            .sort
            .selector_for(target.as_str())
            .ok_or_else(|| QtopError::InvalidColumns {
                details: format!("sort column {target} has no selector"),
            })?;
        self.update_sort_column(selector, sink)
    }

    /// Handle list-level input.
    ///
    /// Activation emits [`ListEvent::QuerySelected`] with the focused row's
    /// focus-column value (nothing happens on an empty list). Navigation is
    /// returned unhandled for the scrolling primitive.
    pub fn handle_input(
        &mut self,
        input: ListInput,
        sink: &mut impl EventSink,
    ) -> Result<InputOutcome> {
        match input {
            ListInput::Activate => {
                if let Some(value) = self.selected_value() {
                    sink.emit(ListEvent::QuerySelected(value))?;
                }
                Ok(InputOutcome::Handled)
            }
            ListInput::ChangeSort(selector) => {
                self.update_sort_column(selector, sink)?;
                Ok(InputOutcome::Handled)
            }
            ListInput::ToggleSort => {
                self.toggle_sort(sink)?;
                Ok(InputOutcome::Handled)
            }
            ListInput::Navigate(_) => Ok(InputOutcome::Unhandled(input)),
        }
    }

    /// Move focus. Returns whether it changed.
    pub fn scroll(&mut self, nav: Nav) -> bool {
        self.viewport.navigate(nav, self.order.len())
    }

    /// Run the viewport pass for a window `height` rows tall and compose the
    /// visible rows into a frame `width` cells wide.
    pub fn render(&mut self, width: usize, height: usize) -> Frame {
        let len = self.order.len();
        self.viewport.prepare(len, height, self.follow_bottom);
        let focus = self.viewport.focus();
        let range = self.viewport.visible_range(len);
        let start = range.start;
        let visible = self.order[range]
            .iter()
            .enumerate()
            .filter_map(|(i, key)| self.rows.get(key).map(|row| (row, start + i == focus)));
        frame::compose(self.columns.columns(), self.sort.active(), width, visible)
    }

    fn selected_value(&self) -> Option<Value> {
        self.focused_row()?
            .value(self.columns.focus_column().as_str())
            .cloned()
    }

    fn position(&self, key: &EntryKey) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }

    fn resort(&mut self) {
        sort::sort_descending(&mut self.order, &self.rows, self.sort.active().as_str());
    }
}
