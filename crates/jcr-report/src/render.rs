//! Paginated document model for report output.
//!
//! Output backends draw from this model. Every cell goes through the
//! [`FootnoteTracker`], tables are split into pages of `rows_per_page`, and
//! footnotes from all tables are collected once for a trailing appendix.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::debug;

use jcr_types::{FootnoteColumn, FootnoteEntry, Table, TypeError};

use crate::cell::{CellContext, FootnoteTracker};
use crate::error::{ReportError, ReportResult};

/// Cell width preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Full,
    Compact,
}

impl RenderMode {
    pub fn default_max_len(self) -> usize {
        match self {
            Self::Full => 140,
            Self::Compact => 60,
        }
    }
}

/// Settings for one render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub title: String,
    pub mode: RenderMode,
    /// Overrides the mode's cell width when set.
    pub max_cell_len: Option<usize>,
    pub rows_per_page: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "JSON Change Report".into(),
            mode: RenderMode::Full,
            max_cell_len: None,
            rows_per_page: 40,
        }
    }
}

impl RenderConfig {
    /// Effective maximum cell length in characters.
    pub fn max_len(&self) -> usize {
        self.max_cell_len
            .unwrap_or_else(|| self.mode.default_max_len())
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.rows_per_page == 0 {
            return Err(ReportError::InvalidConfig(
                "rows_per_page must be at least 1".into(),
            ));
        }
        if self.max_cell_len == Some(0) {
            return Err(ReportError::InvalidConfig(
                "max_cell_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A displayed cell and the number of its footnote, if it was truncated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedCell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnote: Option<usize>,
}

/// One page: a slice of a single table's rows under its header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number within the document.
    pub number: usize,
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RenderedCell>>,
    /// The table started on an earlier page.
    pub continued: bool,
}

/// A fully laid-out report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub title: String,
    pub pages: Vec<Page>,
    pub footnotes: Vec<FootnoteEntry>,
}

/// Lay out tables as pages, truncating cells and collecting footnotes.
pub fn render_document(tables: &[Table], config: &RenderConfig) -> ReportResult<RenderedDocument> {
    config.validate()?;
    let mut tracker = FootnoteTracker::new(config.max_len());
    let mut pages = Vec::new();

    for table in tables {
        check_widths(table)?;
        let rows: Vec<Vec<RenderedCell>> = table
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| render_row(&mut tracker, table, idx + 1, row))
            .collect();

        let mut chunks: Vec<Vec<Vec<RenderedCell>>> = rows
            .chunks(config.rows_per_page)
            .map(<[_]>::to_vec)
            .collect();
        if chunks.is_empty() {
            chunks.push(Vec::new());
        }
        for (part, chunk) in chunks.into_iter().enumerate() {
            pages.push(Page {
                number: pages.len() + 1,
                table: table.name.clone(),
                columns: table.columns.clone(),
                rows: chunk,
                continued: part > 0,
            });
        }
    }

    let footnotes = tracker.into_entries();
    debug!(
        tables = tables.len(),
        pages = pages.len(),
        footnotes = footnotes.len(),
        "rendered document"
    );
    Ok(RenderedDocument {
        title: config.title.clone(),
        pages,
        footnotes,
    })
}

fn check_widths(table: &Table) -> ReportResult<()> {
    for (idx, row) in table.rows.iter().enumerate() {
        if row.len() != table.columns.len() {
            return Err(ReportError::Table {
                table: table.name.clone(),
                source: TypeError::RowWidth {
                    row: idx + 1,
                    expected: table.columns.len(),
                    actual: row.len(),
                },
            });
        }
    }
    Ok(())
}

fn render_row(
    tracker: &mut FootnoteTracker,
    table: &Table,
    row: usize,
    cells: &[String],
) -> Vec<RenderedCell> {
    cells
        .iter()
        .enumerate()
        .map(|(col, cell)| {
            let column = match table.columns[col].as_str() {
                "" => FootnoteColumn::Index(col + 1),
                name => FootnoteColumn::Name(name.to_string()),
            };
            let ctx = CellContext {
                table: &table.name,
                row,
                column,
            };
            let (text, footnote) = tracker.render(cell, &ctx);
            RenderedCell { text, footnote }
        })
        .collect()
}

impl RenderedDocument {
    /// Plain-text layout: pages in order, then the numbered appendix.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.chars().count()));

        for page in &self.pages {
            let suffix = if page.continued { " (continued)" } else { "" };
            let _ = writeln!(out, "\n[page {}] {}{}", page.number, page.table, suffix);
            let _ = writeln!(out, "{}", page.columns.join(" | "));
            for row in &page.rows {
                let cells: Vec<String> = row
                    .iter()
                    .map(|c| match c.footnote {
                        Some(n) => format!("{}[{n}]", c.text),
                        None => c.text.clone(),
                    })
                    .collect();
                let _ = writeln!(out, "{}", cells.join(" | "));
            }
        }

        if !self.footnotes.is_empty() {
            let _ = writeln!(out, "\nAppendix");
            for (idx, note) in self.footnotes.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "[{}] {}, row {}, {}: {}",
                    idx + 1,
                    note.table,
                    note.row,
                    note.column,
                    note.full
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, rows: usize, cell: &str) -> Table {
        let mut t = Table::new(name, ["Path", "New Value"]);
        for i in 0..rows {
            t.push_row(vec![format!("p{i}"), cell.to_string()]).unwrap();
        }
        t
    }

    #[test]
    fn default_config() {
        let c = RenderConfig::default();
        assert_eq!(c.max_len(), 140);
        assert_eq!(c.rows_per_page, 40);
        let compact = RenderConfig {
            mode: RenderMode::Compact,
            ..RenderConfig::default()
        };
        assert_eq!(compact.max_len(), 60);
        let custom = RenderConfig {
            max_cell_len: Some(12),
            ..compact
        };
        assert_eq!(custom.max_len(), 12);
    }

    #[test]
    fn invalid_config_rejected() {
        let c = RenderConfig {
            rows_per_page: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(render_document(&[], &c), Err(ReportError::InvalidConfig(_))));
    }

    #[test]
    fn tables_split_into_pages() {
        let config = RenderConfig {
            rows_per_page: 2,
            ..RenderConfig::default()
        };
        let doc = render_document(&[table("a", 5, "1"), table("b", 0, "1")], &config).unwrap();
        let shape: Vec<_> = doc
            .pages
            .iter()
            .map(|p| (p.number, p.table.as_str(), p.rows.len(), p.continued))
            .collect();
        assert_eq!(
            shape,
            vec![
                (1, "a", 2, false),
                (2, "a", 2, true),
                (3, "a", 1, true),
                (4, "b", 0, false),
            ]
        );
    }

    #[test]
    fn footnotes_accumulate_across_tables() {
        let long = "v".repeat(30);
        let config = RenderConfig {
            max_cell_len: Some(10),
            ..RenderConfig::default()
        };
        let doc = render_document(&[table("a", 1, &long), table("b", 2, &long)], &config).unwrap();
        assert_eq!(doc.footnotes.len(), 3);
        assert_eq!(doc.footnotes[0].table, "a");
        assert_eq!(doc.footnotes[2].table, "b");
        assert_eq!(doc.footnotes[2].row, 2);
        assert_eq!(doc.pages[1].rows[1][1].footnote, Some(3));
        assert_eq!(doc.pages[1].rows[1][1].text.chars().count(), 10);
    }

    #[test]
    fn blank_headers_use_column_index() {
        let mut t = Table::new("raw", ["", ""]);
        t.push_row(vec!["x".into(), "w".repeat(20)]).unwrap();
        let config = RenderConfig {
            max_cell_len: Some(5),
            ..RenderConfig::default()
        };
        let doc = render_document(&[t], &config).unwrap();
        assert_eq!(doc.footnotes[0].column, FootnoteColumn::Index(2));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let t = Table {
            name: "bad".into(),
            columns: vec!["A".into(), "B".into()],
            rows: vec![vec!["only".into()]],
        };
        let err = render_document(&[t], &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, ReportError::Table { ref table, .. } if table == "bad"));
    }

    #[test]
    fn text_layout_with_appendix() {
        let config = RenderConfig {
            title: "Release".into(),
            max_cell_len: Some(6),
            ..RenderConfig::default()
        };
        let doc = render_document(&[table("cfg.json", 1, "\"abcdefghij\"")], &config).unwrap();
        let text = doc.to_text();
        assert!(text.starts_with("Release\n=======\n"));
        assert!(text.contains("[page 1] cfg.json\nPath | New Value\np0 | abcde…[1]\n"));
        assert!(text.contains("Appendix\n[1] cfg.json, row 1, New Value: \"abcdefghij\"\n"));
    }

    #[test]
    fn config_from_partial_json() {
        let c: RenderConfig = serde_json::from_str(r#"{"mode": "compact"}"#).unwrap();
        assert_eq!(c.mode, RenderMode::Compact);
        assert_eq!(c.rows_per_page, 40);
    }
}
