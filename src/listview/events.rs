//! Typed notifications emitted by the list view.

use crossbeam_channel::Sender;
use serde::Serialize;

use crate::columns::{ColumnId, Value};
use crate::core::errors::{QtopError, Result};

/// Notification pushed synchronously to the caller's sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ListEvent {
    /// The user switched the sort column; carries the new active column.
    SortColumnChanged(ColumnId),
    /// The user activated the focused row; carries its identifying value.
    QuerySelected(Value),
}

/// Receiver of [`ListEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: ListEvent) -> Result<()>;
}

impl EventSink for Vec<ListEvent> {
    fn emit(&mut self, event: ListEvent) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

impl EventSink for Sender<ListEvent> {
    fn emit(&mut self, event: ListEvent) -> Result<()> {
        self.send(event).map_err(|_| QtopError::ChannelClosed {
            component: "list-events",
        })
    }
}
