//! Table building: group flattened changes into named tables.
//!
//! Two presentation modes exist. [`TableMode::Full`] shows every change with
//! its old and new value; [`TableMode::Added`] keeps only additions and drops
//! the old-value column. Output is a pure function of the input: file order
//! is first-seen order and rows follow flatten order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use jcr_diff::flatten;
use jcr_types::{ChangeRecord, CommitPair, FileDelta, Table};

pub const PATH_COLUMN: &str = "Path";
pub const OLD_VALUE_COLUMN: &str = "Old Value";
pub const NEW_VALUE_COLUMN: &str = "New Value";

/// Table name for ad-hoc added-only uploads.
pub const ADDED_TABLE_NAME: &str = "Added";

/// How change records are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    /// `[Path, Old Value, New Value]`, every change.
    #[default]
    Full,
    /// `[Path, New Value]`, additions only.
    Added,
}

/// Render one side of a change as a cell: compact JSON, or empty when absent.
pub fn stringify_value(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_default()
}

/// Flatten every file's delta and group the records by file name.
///
/// Groups appear in order of each file's first appearance; records of a file
/// listed more than once are concatenated. Files contributing no records are
/// left out.
pub fn group_by_file(files: &[FileDelta]) -> Vec<(String, Vec<ChangeRecord>)> {
    let mut groups: Vec<(String, Vec<ChangeRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in files {
        let records = flatten(&entry.diff);
        if records.is_empty() {
            continue;
        }
        match index.get(entry.file.as_str()) {
            Some(&pos) => groups[pos].1.extend(records),
            None => {
                index.insert(entry.file.as_str(), groups.len());
                groups.push((entry.file.clone(), records));
            }
        }
    }

    groups
}

/// One `[Path, Old Value, New Value]` table per changed file.
pub fn per_file_tables(files: &[FileDelta]) -> Vec<Table> {
    group_by_file(files)
        .into_iter()
        .map(|(file, records)| full_table(file, &records))
        .collect()
}

/// One `[Path, New Value]` table of additions per file that has any.
pub fn per_file_added_tables(files: &[FileDelta]) -> Vec<Table> {
    group_by_file(files)
        .into_iter()
        .map(|(file, records)| added_rows(file, &records))
        .filter(|table| !table.is_empty())
        .collect()
}

/// Build tables for a set of per-file deltas in the given mode.
pub fn build_tables(files: &[FileDelta], mode: TableMode) -> Vec<Table> {
    match mode {
        TableMode::Full => per_file_tables(files),
        TableMode::Added => per_file_added_tables(files),
    }
}

/// Additions of a single delta as a `[Path, New Value]` table named `name`.
pub fn added_table(name: impl Into<String>, delta: &Value) -> Table {
    added_rows(name.into(), &flatten(delta))
}

/// Additions of an ad-hoc delta as a table named [`ADDED_TABLE_NAME`].
pub fn added_only_table(delta: &Value) -> Table {
    added_table(ADDED_TABLE_NAME, delta)
}

fn full_table(name: String, records: &[ChangeRecord]) -> Table {
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.path.clone(),
                stringify_value(r.before.as_ref()),
                stringify_value(r.after.as_ref()),
            ]
        })
        .collect();
    Table {
        name,
        columns: vec![
            PATH_COLUMN.to_string(),
            OLD_VALUE_COLUMN.to_string(),
            NEW_VALUE_COLUMN.to_string(),
        ],
        rows,
    }
}

fn added_rows(name: String, records: &[ChangeRecord]) -> Table {
    let rows = records
        .iter()
        .filter(|r| r.is_addition())
        .map(|r| vec![r.path.clone(), stringify_value(r.after.as_ref())])
        .collect();
    Table {
        name,
        columns: vec![PATH_COLUMN.to_string(), NEW_VALUE_COLUMN.to_string()],
        rows,
    }
}

/// The deterministic part of one analysis: what was compared and the tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<CommitPair>,
    pub tables: Vec<Table>,
}

impl Report {
    /// Build a report from per-file deltas.
    pub fn from_files(title: impl Into<String>, files: &[FileDelta], mode: TableMode) -> Self {
        Self {
            title: title.into(),
            commits: None,
            tables: build_tables(files, mode),
        }
    }

    pub fn with_commits(mut self, commits: CommitPair) -> Self {
        self.commits = Some(commits);
        self
    }

    /// Total rows across all tables.
    pub fn change_count(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }
}
