//! Result shapes returned by the summary service.
//!
//! The service answers `{"result": ...}` where the result may carry a
//! description, a list of tables, a single table, or per-file summaries.
//! Shapes are recognized in that precedence order (tables, table, files,
//! description); anything else is kept verbatim as [`AiBody::Opaque`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use jcr_types::Table;

use crate::request::OutputMode;

const DEFAULT_TITLE: &str = "AI Documentation";
const TEXT_COLUMN: &str = "Text";

/// A per-file summary in the `files` result shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file: String,
    #[serde(rename = "changeType")]
    pub change_type: String,
    pub changes: Vec<String>,
    pub notes: String,
}

/// The recognized payload of a service result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AiBody {
    /// Only a description was returned.
    Summary,
    Tables(Vec<Table>),
    Table(Table),
    Files(Vec<FileSummary>),
    /// Unrecognized result, displayed as is.
    Opaque(Value),
}

/// A classified service result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub body: AiBody,
}

impl AiOutput {
    pub fn summary(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: Some(description.into()),
            body: AiBody::Summary,
        }
    }

    /// Classify the `result` object of a service response.
    pub fn from_result(result: Value) -> Self {
        let Value::Object(map) = result else {
            return Self::opaque(result);
        };
        let title = string_field(&map, "title");
        let description = string_field(&map, "description");

        let body = if let Some(Value::Array(tables)) = map.get("tables") {
            AiBody::Tables(
                tables
                    .iter()
                    .enumerate()
                    .map(|(idx, t)| normalize_table(t, &format!("Table {}", idx + 1)))
                    .collect(),
            )
        } else if let Some(table @ Value::Object(_)) = map.get("table") {
            AiBody::Table(normalize_table(table, "Table"))
        } else if let Some(Value::Array(files)) = map.get("files") {
            AiBody::Files(files.iter().map(normalize_file).collect())
        } else if description.is_some() {
            AiBody::Summary
        } else {
            return Self::opaque(Value::Object(map));
        };

        Self {
            title,
            description,
            body,
        }
    }

    /// Interpret a whole response envelope, `{"result": ...}`.
    ///
    /// Bodies without a `result` key are kept as opaque output.
    pub fn from_envelope(body: Value) -> Self {
        match body {
            Value::Object(mut map) if map.contains_key("result") => {
                Self::from_result(map.remove("result").unwrap_or(Value::Null))
            }
            other => Self::opaque(other),
        }
    }

    fn opaque(value: Value) -> Self {
        Self {
            title: None,
            description: None,
            body: AiBody::Opaque(value),
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Display text for a loose JSON value: strings as is, null as empty.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Coerce a loosely shaped table into a well-formed [`Table`].
///
/// Columns that are not all strings become `["Text"]`; rows are padded with
/// empty cells or cut to the column count, and every cell is stringified.
pub fn normalize_table(value: &Value, fallback_name: &str) -> Table {
    let Value::Object(map) = value else {
        return Table {
            name: fallback_name.to_string(),
            columns: vec![TEXT_COLUMN.to_string()],
            rows: vec![vec![cell_text(value)]],
        };
    };

    let name = string_field(map, "name").unwrap_or_else(|| fallback_name.to_string());
    let columns: Vec<String> = match map.get("columns") {
        Some(Value::Array(cols)) if cols.iter().all(Value::is_string) => {
            cols.iter().map(cell_text).collect()
        }
        _ => vec![TEXT_COLUMN.to_string()],
    };

    let rows = match map.get("rows") {
        Some(Value::Array(rows)) if rows.iter().all(Value::is_array) => rows
            .iter()
            .filter_map(Value::as_array)
            .map(|row| {
                let mut cells: Vec<String> = row.iter().take(columns.len()).map(cell_text).collect();
                cells.resize(columns.len(), String::new());
                cells
            })
            .collect(),
        _ => Vec::new(),
    };

    Table {
        name,
        columns,
        rows,
    }
}

/// Coerce a loosely shaped file summary, filling defaults and accepting aliases.
pub fn normalize_file(value: &Value) -> FileSummary {
    let Value::Object(map) = value else {
        return FileSummary {
            file: "Unknown".into(),
            change_type: "unknown".into(),
            changes: vec![cell_text(value)],
            notes: String::new(),
        };
    };

    let non_empty = |key: &str| string_field(map, key).filter(|s| !s.is_empty());
    let file = non_empty("file")
        .or_else(|| non_empty("name"))
        .unwrap_or_else(|| "Unknown".into());
    let change_type = non_empty("changeType")
        .or_else(|| non_empty("change_type"))
        .unwrap_or_else(|| "unknown".into());

    let changes = match map.get("changes") {
        Some(Value::Array(items)) => items.iter().map(cell_text).collect(),
        None | Some(Value::Null) => match map.get("diff") {
            Some(diff) => vec![diff.to_string()],
            None => Vec::new(),
        },
        Some(other) => vec![cell_text(other)],
    };

    let notes = match map.get("notes") {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    };

    FileSummary {
        file,
        change_type,
        changes,
        notes,
    }
}

/// Interpret raw model text for a given mode, as the service does.
///
/// Text that parses as JSON is classified normally (summary mode keeps only
/// its `description`). Other text becomes the description, and in table mode
/// also a single-cell `Text` table.
pub fn parse_model_text(text: &str, mode: OutputMode) -> AiOutput {
    let parsed: Option<Value> = serde_json::from_str(text).ok();

    if mode == OutputMode::Summary {
        let description = match parsed {
            Some(Value::Object(map)) => string_field(&map, "description").unwrap_or_default(),
            Some(other) => cell_text(&other),
            None => text.to_string(),
        };
        return AiOutput::summary(description);
    }

    if let Some(value) = parsed {
        let mut output = AiOutput::from_result(value);
        if !matches!(output.body, AiBody::Opaque(_)) && output.title.is_none() {
            output.title = Some(DEFAULT_TITLE.into());
        }
        return output;
    }

    let body = match mode {
        OutputMode::Table => AiBody::Table(Table {
            name: "Table".into(),
            columns: vec![TEXT_COLUMN.to_string()],
            rows: vec![vec![text.to_string()]],
        }),
        _ => AiBody::Files(Vec::new()),
    };
    AiOutput {
        title: Some(DEFAULT_TITLE.into()),
        description: Some(text.to_string()),
        body,
    }
}
