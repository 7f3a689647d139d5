//! Terminal dashboard: crossterm painter, key routing and the event loop
//! around [`crate::listview::QueryList`].

#![allow(missing_docs)]

pub mod input;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;

pub use runtime::{DashboardRuntimeConfig, DashboardSession, run_dashboard};
