//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use qtop::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{QtopError, Result};

// Columns
pub use crate::columns::plancache::default_columns;
pub use crate::columns::{ColorClass, ColumnDescriptor, ColumnFormat, ColumnId, ColumnSet, Value};

// Snapshots
pub use crate::snapshot::source::{JsonFileSource, Poller, SnapshotSource};
pub use crate::snapshot::{EntryKey, Record, Snapshot};

// List view
pub use crate::listview::{
    EventSink, Frame, InputOutcome, ListEvent, ListInput, Nav, QueryList, ReconcileReport,
};

// Logging
pub use crate::logger::{EventType, JsonlWriter, LogEntry};
