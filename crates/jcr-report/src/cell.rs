//! Cell truncation and footnote tracking.
//!
//! Over-long cells are cut to `max_len` characters (the last one being
//! [`ELLIPSIS`]) and the full text is kept as a [`FootnoteEntry`] for the
//! report appendix. Lengths are counted in characters, not bytes.

use jcr_types::{FootnoteColumn, FootnoteEntry};

/// Marker appended to truncated cells.
pub const ELLIPSIS: char = '…';

/// Where a cell sits, for footnote cross-referencing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellContext<'a> {
    pub table: &'a str,
    /// 1-based row number within the table.
    pub row: usize,
    pub column: FootnoteColumn,
}

/// Unwrap one layer of double quotes, for display only.
///
/// `"\"text\""` becomes `text`; anything not quote-delimited is returned as is.
/// Escapes inside the string are left untouched.
pub fn dequote(cell: &str) -> &str {
    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        &cell[1..cell.len() - 1]
    } else {
        cell
    }
}

/// Render one cell for display.
///
/// Returns the display string and, when it had to be truncated, a footnote
/// carrying the untruncated cell text as given. `max_len` below 1 is treated as 1.
pub fn render_cell(
    cell: &str,
    max_len: usize,
    ctx: &CellContext<'_>,
) -> (String, Option<FootnoteEntry>) {
    let max_len = max_len.max(1);
    let display = dequote(cell);
    if display.chars().count() <= max_len {
        return (display.to_string(), None);
    }

    let mut shortened: String = display.chars().take(max_len - 1).collect();
    shortened.push(ELLIPSIS);
    let note = FootnoteEntry {
        table: ctx.table.to_string(),
        row: ctx.row,
        column: ctx.column.clone(),
        full: cell.to_string(),
    };
    (shortened, Some(note))
}

/// Collects footnotes across every table of one render.
#[derive(Clone, Debug, Default)]
pub struct FootnoteTracker {
    max_len: usize,
    entries: Vec<FootnoteEntry>,
}

impl FootnoteTracker {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            entries: Vec::new(),
        }
    }

    /// Render a cell, recording a footnote if it was truncated.
    ///
    /// Returns the display string and the 1-based footnote number, if any.
    pub fn render(&mut self, cell: &str, ctx: &CellContext<'_>) -> (String, Option<usize>) {
        let (display, note) = render_cell(cell, self.max_len, ctx);
        let number = note.map(|note| {
            self.entries.push(note);
            self.entries.len()
        });
        (display, number)
    }

    pub fn entries(&self) -> &[FootnoteEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<FootnoteEntry> {
        self.entries
    }
}
