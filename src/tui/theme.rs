//! Color theme for the list view, with `NO_COLOR` support.

#![allow(missing_docs)]

use std::env;

use crossterm::style::Color;

use crate::columns::ColorClass;

/// Color output mode for compatibility with `NO_COLOR` and terminal policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Enabled,
    Disabled,
}

/// Concrete style of one painted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub reverse: bool,
}

/// Maps semantic classes to terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    color: ColorMode,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ColorMode::Enabled)
    }
}

impl Theme {
    #[must_use]
    pub const fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Theme for this process: colorless if `no_color` is set or the
    /// `NO_COLOR` environment variable is present.
    #[must_use]
    pub fn resolve(no_color: bool) -> Self {
        Self::resolve_with(no_color, env::var_os("NO_COLOR").is_some())
    }

    #[must_use]
    pub const fn resolve_with(no_color_flag: bool, no_color_env: bool) -> Self {
        if no_color_flag || no_color_env {
            Self::new(ColorMode::Disabled)
        } else {
            Self::new(ColorMode::Enabled)
        }
    }

    #[must_use]
    pub const fn no_color(self) -> bool {
        matches!(self.color, ColorMode::Disabled)
    }

    /// Style of a row cell. The focused row is highlighted; without color
    /// that means reverse video.
    #[must_use]
    pub const fn cell(self, class: ColorClass, focused: bool) -> CellStyle {
        if self.no_color() {
            return CellStyle {
                fg: None,
                bg: None,
                bold: false,
                reverse: focused,
            };
        }
        let fg = match class {
            ColorClass::Neutral => Color::Reset,
            ColorClass::Low => Color::Green,
            ColorClass::Moderate => Color::Yellow,
            ColorClass::High => Color::DarkYellow,
            ColorClass::Extreme => Color::Red,
        };
        if focused {
            CellStyle {
                fg: Some(match class {
                    ColorClass::Neutral => Color::White,
                    _ => fg,
                }),
                bg: Some(Color::DarkBlue),
                bold: true,
                reverse: false,
            }
        } else {
            CellStyle {
                fg: Some(fg),
                bg: None,
                bold: false,
                reverse: false,
            }
        }
    }

    /// Style of a column title; the active sort column stands out.
    #[must_use]
    pub const fn header(self, sorted: bool) -> CellStyle {
        CellStyle {
            fg: if self.no_color() {
                None
            } else if sorted {
                Some(Color::Cyan)
            } else {
                Some(Color::Grey)
            },
            bg: None,
            bold: true,
            reverse: false,
        }
    }

    /// Style of the status line.
    #[must_use]
    pub const fn status(self, error: bool) -> CellStyle {
        CellStyle {
            fg: if self.no_color() {
                None
            } else if error {
                Some(Color::Red)
            } else {
                Some(Color::DarkGrey)
            },
            bg: None,
            bold: error,
            reverse: false,
        }
    }
}
