//! Request payloads sent to the summary service.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use jcr_diff::flatten;
use jcr_types::{ChangeKind, FileDelta};

/// What the service should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// `{description}` only.
    Summary,
    /// `{title, description, tables}`.
    MultiTables,
    /// `{title, description, table}`.
    Table,
    /// `{title, description, files}`.
    #[default]
    Files,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::MultiTables => write!(f, "multi_tables"),
            Self::Table => write!(f, "table"),
            Self::Files => write!(f, "files"),
        }
    }
}

/// A flattened change tagged with the file it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatChange {
    pub file: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl FlatChange {
    pub fn kind(&self) -> ChangeKind {
        ChangeKind::from_sides(self.before.is_some(), self.after.is_some())
    }
}

/// Flatten every file's delta into file-tagged changes, in input order.
pub fn flat_changes(files: &[FileDelta]) -> Vec<FlatChange> {
    files
        .iter()
        .flat_map(|fd| {
            flatten(&fd.diff).into_iter().map(move |r| FlatChange {
                file: fd.file.clone(),
                path: r.path,
                before: r.before,
                after: r.after,
            })
        })
        .collect()
}

/// The input half of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiPayload {
    /// A template, either parsed JSON or free text.
    Template { template: Value },
    Changes {
        changes: Vec<FlatChange>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// One call to the summary service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiRequest {
    #[serde(flatten)]
    pub payload: AiPayload,
    #[serde(default)]
    pub output: OutputMode,
}

impl AiRequest {
    /// A template request. Text that parses as JSON is sent parsed.
    pub fn template(text: &str, output: OutputMode) -> Self {
        let template = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.into()));
        Self {
            payload: AiPayload::Template { template },
            output,
        }
    }

    pub fn changes(changes: Vec<FlatChange>, output: OutputMode) -> Self {
        Self {
            payload: AiPayload::Changes {
                changes,
                title: None,
                description: None,
            },
            output,
        }
    }

    /// Attach a title and description to a changes request; templates ignore them.
    pub fn with_heading(mut self, new_title: impl Into<String>, new_description: impl Into<String>) -> Self {
        if let AiPayload::Changes {
            title, description, ..
        } = &mut self.payload
        {
            *title = Some(new_title.into());
            *description = Some(new_description.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mode_wire_names() {
        assert_eq!(serde_json::to_value(OutputMode::MultiTables).unwrap(), json!("multi_tables"));
        assert_eq!(OutputMode::Summary.to_string(), "summary");
        assert_eq!(OutputMode::default(), OutputMode::Files);
    }

    #[test]
    fn flat_changes_keep_file_and_order() {
        let files = vec![
            FileDelta::new("a.json", json!({"x": [1], "y": [1, 2]})),
            FileDelta::new("b.json", json!({"z": [3, 0, 0]})),
        ];
        let changes = flat_changes(&files);
        let keys: Vec<_> = changes.iter().map(|c| (c.file.as_str(), c.path.as_str())).collect();
        assert_eq!(keys, vec![("a.json", "x"), ("a.json", "y"), ("b.json", "z")]);
        assert!(changes[2].after.is_none());
        let kinds: Vec<_> = changes.iter().map(FlatChange::kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Added, ChangeKind::Modified, ChangeKind::Removed]);
    }

    #[test]
    fn changes_request_wire_shape() {
        let req = AiRequest::changes(
            vec![FlatChange {
                file: "a.json".into(),
                path: "x".into(),
                before: None,
                after: Some(json!(5)),
            }],
            OutputMode::Summary,
        )
        .with_heading("Release 2", "Config updates");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "changes": [{"file": "a.json", "path": "x", "after": 5}],
                "title": "Release 2",
                "description": "Config updates",
                "output": "summary"
            })
        );
    }

    #[test]
    fn template_text_is_parsed_when_json() {
        let req = AiRequest::template(r#"{"P31": []}"#, OutputMode::MultiTables);
        assert_eq!(req.payload, AiPayload::Template { template: json!({"P31": []}) });

        let req = AiRequest::template("free text", OutputMode::Summary);
        assert_eq!(req.payload, AiPayload::Template { template: json!("free text") });
    }

    #[test]
    fn request_round_trip_picks_variant() {
        let req: AiRequest =
            serde_json::from_value(json!({"changes": [], "output": "multi_tables"})).unwrap();
        assert!(matches!(req.payload, AiPayload::Changes { .. }));
        assert_eq!(req.output, OutputMode::MultiTables);
    }
}
