//! Key routing for the dashboard runtime.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Serialize;

use crate::listview::{ListInput, Nav};

/// What a key press asks the runtime to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    List(ListInput),
}

/// One line of the key legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Fixed bindings, independent of the column set.
pub const HELP_BINDINGS: [HelpBinding; 7] = [
    HelpBinding {
        keys: "Enter",
        description: "Select the focused query",
    },
    HelpBinding {
        keys: "Tab",
        description: "Toggle default/alternate sort column",
    },
    HelpBinding {
        keys: "Up/k Down/j",
        description: "Move focus one row",
    },
    HelpBinding {
        keys: "PgUp PgDn",
        description: "Move focus one page",
    },
    HelpBinding {
        keys: "Home/g End",
        description: "Jump to first/last row",
    },
    HelpBinding {
        keys: "q Esc",
        description: "Quit",
    },
    HelpBinding {
        keys: "Ctrl-C",
        description: "Quit",
    },
];

/// Resolve a key event with deterministic precedence: Ctrl-C, then sort
/// selectors, then fixed bindings. Release events are ignored.
#[must_use]
pub fn resolve_key_event(key: &KeyEvent, sort_keys: &[char]) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(KeyAction::Quit),
        KeyCode::Char(c) if !ctrl && sort_keys.contains(&c) => {
            Some(KeyAction::List(ListInput::ChangeSort(c)))
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Enter => Some(KeyAction::List(ListInput::Activate)),
        KeyCode::Tab => Some(KeyAction::List(ListInput::ToggleSort)),
        KeyCode::Up | KeyCode::Char('k') => Some(nav(Nav::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(nav(Nav::Down)),
        KeyCode::PageUp => Some(nav(Nav::PageUp)),
        KeyCode::PageDown => Some(nav(Nav::PageDown)),
        KeyCode::Home | KeyCode::Char('g') => Some(nav(Nav::Home)),
        KeyCode::End => Some(nav(Nav::End)),
        _ => None,
    }
}

const fn nav(nav: Nav) -> KeyAction {
    KeyAction::List(ListInput::Navigate(nav))
}
