//! Dashboard runtime: drives the list view from a snapshot poller and the
//! keyboard, logs activity, and repaints on change.
//!
//! [`DashboardSession`] holds everything that does not touch the terminal so it
//! can be exercised headless; [`run_dashboard`] wraps it in the terminal guard
//! and the crossterm event loop.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::mem;
use std::time::Duration;

use crossterm::event::{self, Event};

use super::input::{KeyAction, resolve_key_event};
use super::render::{self, StatusLine};
use super::terminal_guard::TerminalGuard;
use super::theme::Theme;
use crate::core::errors::{QtopError, Result};
use crate::listview::{InputOutcome, ListEvent, ListInput, QueryList};
use crate::logger::{EventType, JsonlWriter, LogEntry, Severity};
use crate::snapshot::source::{PollResult, Poller, SnapshotSource};

/// How long one keyboard poll blocks before snapshots are checked again.
pub const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runtime knobs resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct DashboardRuntimeConfig {
    pub refresh: Duration,
    pub theme: Theme,
    /// Stable hash of the effective config, recorded at start.
    pub config_hash: Option<String>,
}

/// Whether the loop keeps going after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// List view plus the runtime state around it.
pub struct DashboardSession {
    list: QueryList,
    log: JsonlWriter,
    source: String,
    sort_keys: Vec<char>,
    events: Vec<ListEvent>,
    selected: Option<String>,
    error: Option<String>,
}

impl DashboardSession {
    #[must_use]
    pub fn new(list: QueryList, log: JsonlWriter, source: impl Into<String>) -> Self {
        let sort_keys = list.sort_keys().map(|(key, _)| key).collect();
        Self {
            list,
            log,
            source: source.into(),
            sort_keys,
            events: Vec::new(),
            selected: None,
            error: None,
        }
    }

    #[must_use]
    pub fn list(&self) -> &QueryList {
        &self.list
    }

    /// Valid sort selectors, for key routing.
    #[must_use]
    pub fn sort_keys(&self) -> &[char] {
        &self.sort_keys
    }

    /// Last source failure, cleared by the next good snapshot.
    #[must_use]
    pub fn source_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Identifying value of the last selected row.
    #[must_use]
    pub fn last_selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Feed one poll result into the list.
    ///
    /// Source failures keep the current rows and are reported in the status
    /// line; each distinct failure is logged once. A snapshot that breaks the
    /// column schema ends the session.
    pub fn apply_poll(&mut self, polled: PollResult) -> Result<()> {
        match polled {
            Ok(snapshot) => {
                if let Err(e) = self.list.update_entries(snapshot) {
                    return Err(self.fail(e));
                }
                self.error = None;
            }
            Err(e) => {
                let message = e.to_string();
                if self.error.as_deref() != Some(message.as_str()) {
                    let severity = if e.is_retryable() {
                        Severity::Warning
                    } else {
                        Severity::Critical
                    };
                    self.log.write_entry(
                        &LogEntry::from_error(EventType::SourceError, severity, &e)
                            .with_details(self.source.clone()),
                    );
                }
                self.error = Some(message);
            }
        }
        Ok(())
    }

    /// Apply a resolved key press.
    pub fn apply_key(&mut self, action: KeyAction) -> Result<Flow> {
        let input = match action {
            KeyAction::Quit => return Ok(Flow::Quit),
            KeyAction::List(input) => input,
        };
        match self.list.handle_input(input, &mut self.events) {
            Ok(InputOutcome::Unhandled(ListInput::Navigate(nav))) => {
                self.list.scroll(nav);
            }
            Ok(_) => {}
            Err(e) => return Err(self.fail(e)),
        }
        self.drain_events();
        Ok(Flow::Continue)
    }

    #[must_use]
    pub fn status(&self) -> StatusLine {
        let sort = self.list.sort_column();
        let sort_title = self
            .list
            .columns()
            .get(sort.as_str())
            .map_or_else(|| sort.to_string(), |column| column.title.clone());
        StatusLine {
            source: self.source.clone(),
            sort_title,
            rows: self.list.len(),
            selected: self.selected.clone(),
            error: self.error.clone(),
        }
    }

    /// Lay out and paint one screen of `cols` x `rows`.
    pub fn draw(&mut self, out: &mut impl Write, theme: Theme, cols: u16, rows: u16) -> io::Result<()> {
        let frame = self.list.render(
            usize::from(cols),
            usize::from(render::list_height(rows)),
        );
        render::paint(out, &frame, &self.status(), theme, rows)
    }

    pub fn log_start(&mut self, config_hash: Option<String>) {
        let mut entry = LogEntry::new(EventType::DashboardStart, Severity::Info)
            .with_column(self.list.sort_column().as_str())
            .with_details(self.source.clone());
        entry.config_hash = config_hash;
        self.log.write_entry(&entry);
    }

    pub fn log_stop(&mut self, outcome: &Result<()>) {
        let entry = match outcome {
            Ok(()) => LogEntry::new(EventType::DashboardStop, Severity::Info),
            Err(e) => LogEntry::from_error(EventType::DashboardStop, Severity::Critical, e),
        };
        self.log.write_entry(&entry.with_rows(self.list.len()));
    }

    fn drain_events(&mut self) {
        for event in mem::take(&mut self.events) {
            let entry = match event {
                ListEvent::SortColumnChanged(column) => {
                    LogEntry::new(EventType::SortColumnChanged, Severity::Info)
                        .with_column(column.as_str())
                }
                ListEvent::QuerySelected(value) => {
                    let query = value.to_string();
                    self.selected = Some(query.clone());
                    LogEntry::new(EventType::QuerySelected, Severity::Info).with_query(query)
                }
            };
            self.log.write_entry(&entry.with_rows(self.list.len()));
        }
    }

    fn fail(&mut self, error: QtopError) -> QtopError {
        if error.is_contract_violation() {
            self.log.write_entry(
                &LogEntry::from_error(EventType::ContractViolation, Severity::Critical, &error)
                    .with_rows(self.list.len()),
            );
        }
        error
    }
}

/// Run the dashboard until the user quits or a contract violation occurs.
///
/// # Errors
/// Contract violations from the list view and terminal failures. Snapshot
/// source failures are not errors here.
pub fn run_dashboard(
    list: QueryList,
    source: Box<dyn SnapshotSource>,
    log: JsonlWriter,
    config: &DashboardRuntimeConfig,
) -> Result<()> {
    let mut session = DashboardSession::new(list, log, source.describe());
    session.log_start(config.config_hash.clone());

    let poller = Poller::spawn(source, config.refresh);
    let result = match TerminalGuard::new() {
        Ok(guard) => {
            let result = event_loop(&mut session, &poller, config.theme);
            drop(guard);
            result
        }
        Err(source) => Err(QtopError::Terminal { source }),
    };
    drop(poller);

    session.log_stop(&result);
    result
}

fn event_loop(session: &mut DashboardSession, poller: &Poller, theme: Theme) -> Result<()> {
    let mut stdout = io::stdout();
    let mut dirty = true;
    loop {
        while let Some(polled) = poller.try_next() {
            session.apply_poll(polled)?;
            dirty = true;
        }

        if event::poll(KEY_POLL_INTERVAL).map_err(terminal_error)? {
            match event::read().map_err(terminal_error)? {
                Event::Key(key) => {
                    if let Some(action) = resolve_key_event(&key, session.sort_keys()) {
                        if session.apply_key(action)? == Flow::Quit {
                            return Ok(());
                        }
                        dirty = true;
                    }
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        if dirty {
            let (cols, rows) = TerminalGuard::terminal_size();
            session
                .draw(&mut stdout, theme, cols, rows)
                .map_err(terminal_error)?;
            dirty = false;
        }
    }
}

fn terminal_error(source: io::Error) -> QtopError {
    QtopError::Terminal { source }
}
