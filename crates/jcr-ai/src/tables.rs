//! Deterministic table renderers applied before asking a model.
//!
//! In `multi_tables` mode the service formats changes and templates itself,
//! without a model, whenever the input has a recognizable structure.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use jcr_report::{stringify_value, NEW_VALUE_COLUMN, PATH_COLUMN};
use jcr_types::Table;

use crate::output::{cell_text, AiBody, AiOutput};
use crate::request::{AiPayload, AiRequest, FlatChange, OutputMode};

/// One `[Path, New Value]` table per file, in first-seen file order.
///
/// Changes with an empty file name are grouped under `"Changes"`.
pub fn changes_tables(changes: &[FlatChange]) -> Vec<Table> {
    let mut tables: Vec<Table> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for change in changes {
        let pos = *index.entry(change.file.as_str()).or_insert_with(|| {
            let name = if change.file.is_empty() {
                "Changes"
            } else {
                change.file.as_str()
            };
            tables.push(Table::new(name, [PATH_COLUMN, NEW_VALUE_COLUMN]));
            tables.len() - 1
        });
        tables[pos]
            .rows
            .push(vec![change.path.clone(), stringify_value(change.after.as_ref())]);
    }

    tables
}

/// One table per top-level key of a claims template whose value is an array.
///
/// Each entry contributes a row built from its `mainsnak`: property, datatype,
/// entity id, one column per label language (sorted), and rank. When no entry
/// carries an entity id and there are no label languages, the raw datavalue is
/// shown instead.
pub fn template_tables(template: &Value) -> Vec<Table> {
    let Value::Object(map) = template else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, entries)| entries.as_array().map(|e| claims_table(key, e)))
        .collect()
}

fn claims_table(key: &str, entries: &[Value]) -> Table {
    let languages: BTreeSet<&str> = entries
        .iter()
        .filter_map(|e| entity_value(e)["labels"].as_object())
        .flat_map(|labels| labels.keys().map(String::as_str))
        .collect();

    let mut columns: Vec<String> = ["property", "datatype", "id"].map(String::from).to_vec();
    columns.extend(languages.iter().map(|l| l.to_string()));
    columns.push("rank".into());

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            let snak = &entry["mainsnak"];
            let value = entity_value(entry);
            let mut row = vec![
                cell_text(&snak["property"]),
                cell_text(&snak["datatype"]),
                if value.is_object() { cell_text(&value["id"]) } else { String::new() },
            ];
            row.extend(
                languages
                    .iter()
                    .map(|lang| cell_text(&value["labels"][*lang])),
            );
            row.push(cell_text(&entry["rank"]));
            row
        })
        .collect();

    if languages.is_empty() && rows.iter().all(|r| r[2].is_empty()) {
        return raw_claims_table(key, entries);
    }

    Table {
        name: key.to_string(),
        columns,
        rows,
    }
}

fn raw_claims_table(key: &str, entries: &[Value]) -> Table {
    let rows = entries
        .iter()
        .map(|entry| {
            let snak = &entry["mainsnak"];
            let datavalue = match snak.get("datavalue") {
                Some(dv @ Value::Object(_)) => dv["value"].to_string(),
                Some(dv) => dv.to_string(),
                None => Value::Null.to_string(),
            };
            vec![
                cell_text(&snak["property"]),
                cell_text(&snak["datatype"]),
                datavalue,
                cell_text(&entry["rank"]),
            ]
        })
        .collect();

    Table {
        name: key.to_string(),
        columns: ["property", "datatype", "datavalue", "rank"]
            .map(String::from)
            .to_vec(),
        rows,
    }
}

fn entity_value(entry: &Value) -> &Value {
    &entry["mainsnak"]["datavalue"]["value"]
}

/// Produce `multi_tables` output locally when the input allows it.
///
/// Returns `None` for other modes and for free-text templates.
pub fn deterministic_output(request: &AiRequest) -> Option<AiOutput> {
    if request.output != OutputMode::MultiTables {
        return None;
    }
    match &request.payload {
        AiPayload::Template { template } if template.is_object() => Some(AiOutput {
            title: Some("Template Tables".into()),
            description: Some("Structured view of template entries by top-level key.".into()),
            body: AiBody::Tables(template_tables(template)),
        }),
        AiPayload::Changes {
            changes,
            title,
            description,
        } => Some(AiOutput {
            title: Some(title.clone().unwrap_or_else(|| "JSON Changes".into())),
            description: Some(
                description
                    .clone()
                    .unwrap_or_else(|| "Only the new values after changes.".into()),
            ),
            body: AiBody::Tables(changes_tables(changes)),
        }),
        AiPayload::Template { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn change(file: &str, path: &str, after: Option<Value>) -> FlatChange {
        FlatChange {
            file: file.into(),
            path: path.into(),
            before: None,
            after,
        }
    }

    #[test]
    fn changes_grouped_by_file() {
        let changes = vec![
            change("a.json", "x", Some(json!(1))),
            change("", "y", Some(json!("s"))),
            change("a.json", "z", None),
        ];
        let tables = changes_tables(&changes);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "a.json");
        assert_eq!(tables[0].rows, vec![vec!["x", "1"], vec!["z", ""]]);
        assert_eq!(tables[1].name, "Changes");
        assert_eq!(tables[1].rows, vec![vec!["y", "\"s\""]]);
    }

    fn claim(prop: &str, value: Value, rank: &str) -> Value {
        json!({
            "mainsnak": {"property": prop, "datatype": "wikibase-item", "datavalue": {"value": value}},
            "rank": rank
        })
    }

    #[test]
    fn template_with_labels() {
        let template = json!({
            "P31": [
                claim("P31", json!({"id": "Q5", "labels": {"en": "human", "de": "Mensch"}}), "normal"),
                claim("P31", json!({"id": "Q6", "labels": {"fr": "x"}}), "preferred"),
            ],
            "meta": "ignored"
        });
        let tables = template_tables(&template);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.name, "P31");
        assert_eq!(t.columns, vec!["property", "datatype", "id", "de", "en", "fr", "rank"]);
        assert_eq!(
            t.rows[0],
            vec!["P31", "wikibase-item", "Q5", "Mensch", "human", "", "normal"]
        );
        assert_eq!(t.rows[1][2], "Q6");
        assert_eq!(t.rows[1][5], "x");
    }

    #[test]
    fn template_without_ids_shows_raw_datavalue() {
        let template = json!({"P569": [claim("P569", json!({"time": "+1952"}), "normal"), {"rank": "deprecated"}]});
        let t = &template_tables(&template)[0];
        assert_eq!(t.columns, vec!["property", "datatype", "datavalue", "rank"]);
        assert_eq!(t.rows[0][2], r#"{"time":"+1952"}"#);
        assert_eq!(t.rows[1], vec!["", "", "null", "deprecated"]);
    }

    #[test]
    fn non_object_template_has_no_tables() {
        assert!(template_tables(&json!("free text")).is_empty());
    }

    #[test]
    fn deterministic_output_only_for_multi_tables() {
        let req = AiRequest::changes(vec![change("a.json", "x", Some(json!(1)))], OutputMode::Summary);
        assert!(deterministic_output(&req).is_none());

        let req = AiRequest { output: OutputMode::MultiTables, ..req };
        let out = deterministic_output(&req).unwrap();
        assert_eq!(out.title.as_deref(), Some("JSON Changes"));
        assert!(matches!(out.body, AiBody::Tables(ref t) if t.len() == 1));

        let req = AiRequest::template("free text", OutputMode::MultiTables);
        assert!(deterministic_output(&req).is_none());
    }
}
