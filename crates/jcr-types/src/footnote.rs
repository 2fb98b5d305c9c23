//! Footnotes recorded for truncated cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the column a footnote belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FootnoteColumn {
    /// Column header name.
    Name(String),
    /// 1-based column position, for tables without usable headers.
    Index(usize),
}

impl fmt::Display for FootnoteColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Index(idx) => write!(f, "#{idx}"),
        }
    }
}

impl From<&str> for FootnoteColumn {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<usize> for FootnoteColumn {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

/// The untruncated text of a cell shortened during rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteEntry {
    pub table: String,
    /// 1-based row number within the table.
    pub row: usize,
    pub column: FootnoteColumn,
    pub full: String,
}
