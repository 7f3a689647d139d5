//! Frame composition: lays out the header and the visible rows into
//! fixed-width cells for a painter to draw.

use crate::columns::{ColumnDescriptor, ColumnId, ColumnWidth};

use super::row::{Cell, RowEntity};

/// Width of the divider between two adjacent columns.
pub const DIVIDER_WIDTH: usize = 1;

/// Marker appended to the title of the active sort column.
pub const SORT_MARKER: char = '▼';

/// One column title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub title: String,
    pub sorted: bool,
}

/// One row line of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLine {
    pub cells: Vec<Cell>,
    pub focused: bool,
}

/// A composed list view, ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    /// Resolved width of each column, in column order.
    pub widths: Vec<usize>,
    pub header: Vec<HeaderCell>,
    pub lines: Vec<FrameLine>,
}

impl Frame {
    /// Index of the focused line inside `lines`, if one is visible.
    #[must_use]
    pub fn focused_line(&self) -> Option<usize> {
        self.lines.iter().position(|line| line.focused)
    }

    /// Plain-text rendition: header first, then one string per line, every
    /// cell clipped or padded to its column width.
    #[must_use]
    pub fn to_text_lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.lines.len() + 1);
        out.push(self.join(self.header.iter().map(header_text)));
        for line in &self.lines {
            out.push(self.join(line.cells.iter().map(|cell| cell.text.clone())));
        }
        out
    }

    fn join(&self, texts: impl Iterator<Item = String>) -> String {
        let mut line = String::with_capacity(self.width);
        for (i, (text, width)) in texts.zip(&self.widths).enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&fit(&text, *width));
        }
        clip(&line, self.width)
    }
}

/// Title text as displayed, including the sort marker.
#[must_use]
pub fn header_text(cell: &HeaderCell) -> String {
    if cell.sorted {
        format!("{}{SORT_MARKER}", cell.title)
    } else {
        cell.title.clone()
    }
}

/// Resolve column widths for a total `width`.
///
/// Fixed columns get their width first (left to right, as long as room
/// remains); weighted columns share what is left, with the remainder going to
/// the last weighted column.
#[must_use]
pub fn column_widths(columns: &[ColumnDescriptor], width: usize) -> Vec<usize> {
    let dividers = columns.len().saturating_sub(1) * DIVIDER_WIDTH;
    let mut remaining = width.saturating_sub(dividers);

    let mut widths: Vec<usize> = columns
        .iter()
        .map(|column| match column.width {
            ColumnWidth::Fixed(n) => {
                let take = usize::from(n).min(remaining);
                remaining -= take;
                take
            }
            ColumnWidth::Weight(_) => 0,
        })
        .collect();

    let total_weight: usize = columns
        .iter()
        .filter_map(|column| match column.width {
            ColumnWidth::Weight(w) => Some(usize::from(w)),
            ColumnWidth::Fixed(_) => None,
        })
        .sum();
    if total_weight == 0 {
        return widths;
    }

    let mut handed_out = 0;
    let mut last_weighted = None;
    for (i, column) in columns.iter().enumerate() {
        if let ColumnWidth::Weight(w) = column.width {
            let share = remaining * usize::from(w) / total_weight;
            widths[i] = share;
            handed_out += share;
            last_weighted = Some(i);
        }
    }
    if let Some(i) = last_weighted {
        widths[i] += remaining - handed_out;
    }
    widths
}

/// Compose a frame from the visible rows.
#[must_use]
pub fn compose<'a>(
    columns: &[ColumnDescriptor],
    sort_column: &ColumnId,
    width: usize,
    rows: impl IntoIterator<Item = (&'a RowEntity, bool)>,
) -> Frame {
    let header = columns
        .iter()
        .map(|column| HeaderCell {
            title: column.title.clone(),
            sorted: &column.id == sort_column,
        })
        .collect();
    let lines = rows
        .into_iter()
        .map(|(row, focused)| FrameLine {
            cells: row.cells().to_vec(),
            focused,
        })
        .collect();
    Frame {
        width,
        widths: column_widths(columns, width),
        header,
        lines,
    }
}

/// Clip `text` to `width` chars and pad with spaces up to `width`.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColorClass;
    use crate::columns::format::TextFormat;

    fn descriptors() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("a", "AAA", 'A', ColumnWidth::Fixed(4), TextFormat),
            ColumnDescriptor::new("b", "B", 'B', ColumnWidth::Weight(1), TextFormat),
            ColumnDescriptor::new("c", "C", 'C', ColumnWidth::Weight(2), TextFormat),
        ]
    }

    #[test]
    fn widths_fill_available_space() {
        let widths = column_widths(&descriptors(), 30);
        assert_eq!(widths[0], 4);
        assert_eq!(widths.iter().sum::<usize>() + 2, 30);
        assert_eq!(widths[1], 8);
        assert_eq!(widths[2], 16);
    }

    #[test]
    fn narrow_terminal_starves_weighted_columns() {
        let widths = column_widths(&descriptors(), 5);
        assert_eq!(widths, vec![3, 0, 0]);
    }

    #[test]
    fn zero_width_is_all_zero() {
        assert_eq!(column_widths(&descriptors(), 0), vec![0, 0, 0]);
    }

    #[test]
    fn header_marks_sort_column() {
        let frame = compose(&descriptors(), &ColumnId::from("b"), 20, std::iter::empty());
        assert!(!frame.header[0].sorted);
        assert!(frame.header[1].sorted);
        assert_eq!(header_text(&frame.header[1]), "B▼");
        assert_eq!(frame.focused_line(), None);
        assert_eq!(frame.to_text_lines().len(), 1);
    }

    #[test]
    fn text_lines_are_clipped_and_padded() {
        let frame = Frame {
            width: 10,
            widths: vec![3, 6],
            header: vec![
                HeaderCell {
                    title: "LONGTITLE".into(),
                    sorted: false,
                },
                HeaderCell {
                    title: "X".into(),
                    sorted: true,
                },
            ],
            lines: vec![FrameLine {
                cells: vec![
                    Cell {
                        text: "ab".into(),
                        class: ColorClass::Low,
                    },
                    Cell {
                        text: String::new(),
                        class: ColorClass::Neutral,
                    },
                ],
                focused: true,
            }],
        };
        let text = frame.to_text_lines();
        assert_eq!(text[0], "LON X▼    ");
        assert_eq!(text[1], "ab        ");
        assert_eq!(frame.focused_line(), Some(0));
    }
}
