//! Merge service output with the deterministic change tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use jcr_types::Table;

use crate::output::{AiBody, AiOutput, FileSummary};

/// A report combining deterministic tables with whatever the service returned.
///
/// Deterministic tables always come first and are never replaced. Service
/// tables identical to one of them are dropped; an unrecognized result is
/// kept verbatim in `fallback`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedReport {
    pub title: String,
    pub description: String,
    pub tables: Vec<Table>,
    pub ai_tables: Vec<Table>,
    pub files: Vec<FileSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Value>,
}

/// Combine `deterministic` tables with optional service `output`.
pub fn merge_with_tables(
    default_title: &str,
    deterministic: Vec<Table>,
    output: Option<AiOutput>,
) -> MergedReport {
    let mut report = MergedReport {
        title: default_title.to_string(),
        tables: deterministic,
        ..MergedReport::default()
    };
    let Some(output) = output else {
        return report;
    };

    if let Some(title) = output.title.filter(|t| !t.is_empty()) {
        report.title = title;
    }
    report.description = output.description.unwrap_or_default();

    match output.body {
        AiBody::Summary => {}
        AiBody::Tables(tables) => report.add_ai_tables(tables),
        AiBody::Table(table) => report.add_ai_tables(vec![table]),
        AiBody::Files(files) => report.files = files,
        AiBody::Opaque(value) => report.fallback = Some(value),
    }
    report
}

impl MergedReport {
    fn add_ai_tables(&mut self, tables: Vec<Table>) {
        for table in tables {
            if self.tables.contains(&table) || self.ai_tables.contains(&table) {
                continue;
            }
            self.ai_tables.push(table);
        }
    }

    /// Every section as a table, ready for document rendering.
    ///
    /// Order: deterministic tables, service tables, file summaries, then the
    /// fallback as a single pretty-printed cell.
    pub fn render_tables(&self) -> Vec<Table> {
        let mut tables = self.tables.clone();
        tables.extend(self.ai_tables.iter().cloned());

        if !self.files.is_empty() {
            tables.push(Table {
                name: "File Summaries".into(),
                columns: ["File", "Change Type", "Changes", "Notes"]
                    .map(String::from)
                    .to_vec(),
                rows: self
                    .files
                    .iter()
                    .map(|f| {
                        vec![
                            f.file.clone(),
                            f.change_type.clone(),
                            f.changes.join("; "),
                            f.notes.clone(),
                        ]
                    })
                    .collect(),
            });
        }

        if let Some(fallback) = &self.fallback {
            let text = serde_json::to_string_pretty(fallback).unwrap_or_else(|_| fallback.to_string());
            tables.push(Table {
                name: "AI Output".into(),
                columns: vec!["Text".into()],
                rows: vec![vec![text]],
            });
        }
        tables
    }
}
