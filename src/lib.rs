#![forbid(unsafe_code)]

//! qtop: top-style terminal dashboard for a database query plan cache.
//!
//! The heart of the crate is the live list view in [`listview`]:
//! 1. **Reconciliation**: each keyed [`snapshot::Snapshot`] is merged into a
//!    long-lived row collection, preserving row identity across ticks
//! 2. **Sorting**: rows are kept in stable descending order of the active sort
//!    column, switchable by single-key selectors
//! 3. **Auto-follow**: the viewport keeps the newest relevant rows in view
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use qtop::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use qtop::core::config::Config;
//! use qtop::listview::{QueryList, ListEvent};
//! ```

pub mod prelude;

pub mod columns;
pub mod core;
pub mod listview;
pub mod logger;
pub mod snapshot;
#[cfg(feature = "tui")]
pub mod tui;
