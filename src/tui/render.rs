//! Paints a composed list [`Frame`] plus the status line with crossterm.
//!
//! Two entrypoints:
//! - `paint()`: queued crossterm output (production path).
//! - `render_to_string()`: plain text, used by tests.

#![allow(missing_docs)]

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use super::theme::{CellStyle, Theme};
use crate::listview::frame::{self, Frame};

/// Screen rows used by the header and the status line.
pub const CHROME_ROWS: u16 = 2;

/// Bottom line of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub source: String,
    pub sort_title: String,
    pub rows: usize,
    pub selected: Option<String>,
    pub error: Option<String>,
}

impl StatusLine {
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = format!(
            " {} queries | sort: {} | {}",
            self.rows, self.sort_title, self.source
        );
        if let Some(selected) = &self.selected {
            out.push_str(" | selected: ");
            out.push_str(selected);
        }
        if let Some(error) = &self.error {
            out.push_str(" | ");
            out.push_str(error);
        }
        out
    }
}

/// Number of list rows that fit in a terminal `rows` tall.
#[must_use]
pub const fn list_height(rows: u16) -> u16 {
    rows.saturating_sub(CHROME_ROWS)
}

/// Text rendition of a whole screen: header, rows, status line.
#[must_use]
pub fn render_to_string(frame: &Frame, status: &StatusLine) -> String {
    let mut lines = frame.to_text_lines();
    lines.push(frame::fit(&status.text(), frame.width));
    lines.join("\n")
}

/// Queue a full repaint of `frame` and `status` into `out`, then flush.
pub fn paint(
    out: &mut impl Write,
    frame: &Frame,
    status: &StatusLine,
    theme: Theme,
    rows: u16,
) -> io::Result<()> {
    queue!(out, MoveTo(0, 0))?;
    for (i, (cell, width)) in frame.header.iter().zip(&frame.widths).enumerate() {
        if i > 0 {
            queue!(out, Print(' '))?;
        }
        styled(
            out,
            theme.header(cell.sorted),
            &frame::fit(&frame::header_text(cell), *width),
        )?;
    }
    queue!(out, Clear(ClearType::UntilNewLine))?;

    let height = list_height(rows);
    let mut y = 1u16;
    for line in &frame.lines {
        if y > height {
            break;
        }
        queue!(out, MoveTo(0, y))?;
        for (i, (cell, width)) in line.cells.iter().zip(&frame.widths).enumerate() {
            let style = theme.cell(cell.class, line.focused);
            if i > 0 {
                // Divider carries the row highlight so the focused line reads as one bar.
                styled(out, CellStyle { fg: None, ..style }, " ")?;
            }
            styled(out, style, &frame::fit(&cell.text, *width))?;
        }
        queue!(out, Clear(ClearType::UntilNewLine))?;
        y += 1;
    }
    while y <= height {
        queue!(out, MoveTo(0, y), Clear(ClearType::CurrentLine))?;
        y += 1;
    }

    queue!(out, MoveTo(0, rows.saturating_sub(1)))?;
    styled(
        out,
        theme.status(status.error.is_some()),
        &frame::fit(&status.text(), frame.width),
    )?;
    queue!(out, Clear(ClearType::UntilNewLine))?;
    out.flush()
}

fn styled(out: &mut impl Write, style: CellStyle, text: &str) -> io::Result<()> {
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(bg))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    queue!(out, Print(text), SetAttribute(Attribute::Reset))
}
