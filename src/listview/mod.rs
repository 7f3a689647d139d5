//! The live list view of the dashboard.
//!
//! [`QueryList`] mirrors the latest [`Snapshot`](crate::snapshot::Snapshot)
//! as a set of row entities, keeps them sorted descending by the active sort
//! column, and scrolls a viewport over them. Everything here is synchronous
//! and terminal-agnostic; painting lives in `tui`.

pub mod events;
pub mod frame;
pub mod list;
pub mod row;
pub mod sort;
pub mod viewport;

pub use events::{EventSink, ListEvent};
pub use frame::{Frame, FrameLine, HeaderCell};
pub use list::{InputOutcome, ListInput, QueryList, ReconcileReport};
pub use row::{Cell, RowEntity, RowId};
pub use sort::SortState;
pub use viewport::{Nav, Valign, ViewportState};
