//! Named tables of rendered cells.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A named table with a fixed column schema.
///
/// Every row has exactly `columns.len()` cells. Cells are already-rendered
/// strings; an absent value is the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column headers.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, rejecting rows whose width does not match the header.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TypeError> {
        if row.len() != self.columns.len() {
            return Err(TypeError::RowWidth {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx).map(String::as_str)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_row_checks_width() {
        let mut table = Table::new("t", ["Path", "New Value"]);
        table.push_row(vec!["a".into(), "1".into()]).unwrap();
        let err = table.push_row(vec!["b".into()]).unwrap_err();
        assert_eq!(
            err,
            TypeError::RowWidth {
                row: 2,
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn column_skips_short_rows() {
        let table = Table {
            rows: vec![vec!["a".into(), "1".into()], vec!["b".into()]],
            ..Table::new("t", ["Path", "New Value"])
        };
        assert_eq!(table.column("New Value"), Some(vec!["1"]));
        assert_eq!(table.column("Path"), Some(vec!["a", "b"]));
    }

    #[test]
    fn column_lookup() {
        let mut table = Table::new("t", ["Path", "New Value"]);
        table.push_row(vec!["a".into(), "1".into()]).unwrap();
        table.push_row(vec!["b".into(), "2".into()]).unwrap();
        assert_eq!(table.column_index("New Value"), Some(1));
        assert_eq!(table.column("Path"), Some(vec!["a", "b"]));
        assert!(table.column("Old Value").is_none());
    }

    #[test]
    fn serializes_as_plain_object() {
        let table = Table::new("Added", ["Path"]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Added", "columns": ["Path"], "rows": []})
        );
    }
}
