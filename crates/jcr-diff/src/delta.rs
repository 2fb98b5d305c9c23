//! Delta generation: compare two JSON documents and encode the result.
//!
//! Produces deltas in the same encoding [`crate::decode`] reads. Objects are
//! compared key by key; arrays index by index, without move detection.

use serde_json::{json, Map, Value};

use crate::decode::{ARRAY_MARKER, INDEX_PREFIX};

/// Key under which whole-document changes are placed when the root is not an object.
pub const ROOT_KEY: &str = "$";

const ARRAY_MARKER_VALUE: &str = "a";

/// Compute the delta between two values, or `None` if they are equal.
///
/// Keys present only in `after` are encoded as `[after]`, keys present only
/// in `before` as `[before, 0, 0]`, and values of differing type or scalar
/// values as `[before, after]`. Objects that carry an [`ARRAY_MARKER`] key of
/// their own cannot be encoded key by key and are also replaced whole.
pub fn compute_delta(before: &Value, after: &Value) -> Option<Value> {
    if before == after {
        return None;
    }
    match (before, after) {
        (Value::Object(old), Value::Object(new))
            if !old.contains_key(ARRAY_MARKER) && !new.contains_key(ARRAY_MARKER) =>
        {
            Some(Value::Object(diff_objects(old, new)))
        }
        (Value::Array(old), Value::Array(new)) => Some(Value::Object(diff_arrays(old, new))),
        _ => Some(json!([before, after])),
    }
}

/// Compute the delta for a file that may be missing on either side.
///
/// A missing side counts as an empty object when the other side is an
/// object. Otherwise whole-document changes are wrapped under [`ROOT_KEY`]
/// so the result is always a mapping.
pub fn diff_documents(before: Option<&Value>, after: Option<&Value>) -> Option<Value> {
    let empty = Value::Object(Map::new());
    let delta = match (before, after) {
        (None, None) => return None,
        (Some(old), Some(new)) => compute_delta(old, new)?,
        (None, Some(new)) if is_plain_object(new) => compute_delta(&empty, new)?,
        (Some(old), None) if is_plain_object(old) => compute_delta(old, &empty)?,
        (None, Some(new)) => json!([new]),
        (Some(old), None) => json!([old, 0, 0]),
    };
    if delta.is_object() {
        Some(delta)
    } else {
        let mut root = Map::new();
        root.insert(ROOT_KEY.to_string(), delta);
        Some(Value::Object(root))
    }
}

fn is_plain_object(value: &Value) -> bool {
    value.as_object().is_some_and(|map| !map.contains_key(ARRAY_MARKER))
}

fn diff_objects(old: &Map<String, Value>, new: &Map<String, Value>) -> Map<String, Value> {
    let mut delta = Map::new();

    // Added and modified keys, in `new` order.
    for (key, new_val) in new {
        match old.get(key) {
            Some(old_val) => {
                if let Some(child) = compute_delta(old_val, new_val) {
                    delta.insert(key.clone(), child);
                }
            }
            None => {
                delta.insert(key.clone(), json!([new_val]));
            }
        }
    }

    // Removed keys, in `old` order.
    for (key, old_val) in old {
        if !new.contains_key(key) {
            delta.insert(key.clone(), json!([old_val, 0, 0]));
        }
    }

    delta
}

fn diff_arrays(old: &[Value], new: &[Value]) -> Map<String, Value> {
    let mut delta = Map::new();
    delta.insert(ARRAY_MARKER.to_string(), json!(ARRAY_MARKER_VALUE));

    for idx in 0..old.len().max(new.len()) {
        match (old.get(idx), new.get(idx)) {
            (Some(old_val), Some(new_val)) => {
                if let Some(child) = compute_delta(old_val, new_val) {
                    delta.insert(idx.to_string(), child);
                }
            }
            (None, Some(new_val)) => {
                delta.insert(idx.to_string(), json!([new_val]));
            }
            (Some(old_val), None) => {
                delta.insert(format!("{INDEX_PREFIX}{idx}"), json!([old_val, 0, 0]));
            }
            (None, None) => {}
        }
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use jcr_types::{ChangeKind, ChangeRecord};

    #[test]
    fn identical_values_no_delta() {
        let doc = json!({"a": 1, "b": [1, 2, {"c": null}]});
        assert!(compute_delta(&doc, &doc).is_none());
    }

    #[test]
    fn scalar_change_is_modification_tuple() {
        assert_eq!(compute_delta(&json!(1), &json!("one")), Some(json!([1, "one"])));
    }

    #[test]
    fn object_added_removed_modified() {
        let old = json!({"keep": true, "modify": "old", "remove": 42});
        let new = json!({"keep": true, "modify": "new", "added": [1, 2, 3]});

        let delta = compute_delta(&old, &new).unwrap();
        assert_eq!(
            delta,
            json!({"modify": ["old", "new"], "added": [[1, 2, 3]], "remove": [42, 0, 0]})
        );
    }

    #[test]
    fn nested_object_modification() {
        let old = json!({"config": {"debug": false, "port": 8080}});
        let new = json!({"config": {"debug": true, "port": 8080}});
        let records = flatten(&compute_delta(&old, &new).unwrap());
        assert_eq!(
            records,
            vec![ChangeRecord::modified("config.debug", json!(false), json!(true))]
        );
    }

    #[test]
    fn array_growth_and_shrink() {
        let grown = compute_delta(&json!([1, 2]), &json!([1, 2, 3])).unwrap();
        assert_eq!(grown, json!({"_t": "a", "2": [3]}));

        let shrunk = compute_delta(&json!([1, 2, 3]), &json!([1])).unwrap();
        assert_eq!(shrunk, json!({"_t": "a", "_1": [2, 0, 0], "_2": [3, 0, 0]}));
    }

    #[test]
    fn array_element_change_recurses() {
        let old = json!({"servers": [{"host": "a"}, {"host": "b"}]});
        let new = json!({"servers": [{"host": "a"}, {"host": "c"}]});
        let records = flatten(&compute_delta(&old, &new).unwrap());
        assert_eq!(
            records,
            vec![ChangeRecord::modified("servers.1.host", json!("b"), json!("c"))]
        );
    }

    #[test]
    fn type_change_is_whole_value_modification() {
        let delta = compute_delta(&json!({"v": [1]}), &json!({"v": {"x": 1}})).unwrap();
        assert_eq!(delta, json!({"v": [[1], {"x": 1}]}));
    }

    #[test]
    fn decoded_records_cover_every_change() {
        let old = json!({"a": 1, "list": [1, 2, 3], "gone": {"x": 1}});
        let new = json!({"a": 2, "list": [1, 5], "new": null});
        let records = flatten(&compute_delta(&old, &new).unwrap());
        let kinds: Vec<_> = records.iter().map(|r| (r.path.as_str(), r.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                ("a", ChangeKind::Modified),
                ("list.1", ChangeKind::Modified),
                ("list.2", ChangeKind::Removed),
                ("new", ChangeKind::Added),
                ("gone", ChangeKind::Removed),
            ]
        );
    }

    #[test]
    fn new_and_deleted_object_documents() {
        let doc = json!({"name": "svc", "port": 80});
        let added = flatten(&diff_documents(None, Some(&doc)).unwrap());
        assert_eq!(added.len(), 2);
        assert!(added.iter().all(|r| r.kind() == ChangeKind::Added));

        let removed = flatten(&diff_documents(Some(&doc), None).unwrap());
        assert!(removed.iter().all(|r| r.kind() == ChangeKind::Removed));
    }

    #[test]
    fn non_object_documents_wrap_under_root_key() {
        let delta = diff_documents(Some(&json!(1)), Some(&json!(2))).unwrap();
        assert_eq!(delta, json!({"$": [1, 2]}));

        let delta = diff_documents(None, Some(&json!([1]))).unwrap();
        assert_eq!(flatten(&delta), vec![ChangeRecord::added("$", json!([1]))]);
    }

    #[test]
    fn root_array_documents_stay_array_deltas() {
        let delta = diff_documents(Some(&json!([1])), Some(&json!([2]))).unwrap();
        assert_eq!(flatten(&delta), vec![ChangeRecord::modified("0", json!(1), json!(2))]);
    }

    #[test]
    fn marker_key_in_document_replaces_object_whole() {
        let old = json!({"_t": "x", "_id": 1, "name": "a"});
        let new = json!({"_t": "y", "_id": 2, "name": "b"});
        assert_eq!(compute_delta(&old, &new), Some(json!([old, new])));

        let records = flatten(&diff_documents(Some(&old), Some(&new)).unwrap());
        assert_eq!(records, vec![ChangeRecord::modified("$", old.clone(), new.clone())]);

        let nested = compute_delta(&json!({"meta": old, "v": 1}), &json!({"meta": new, "v": 1}));
        let records = flatten(&nested.unwrap());
        assert_eq!(records, vec![ChangeRecord::modified("meta", old, new)]);
    }

    #[test]
    fn new_document_with_marker_key_is_single_addition() {
        let doc = json!({"_t": "x", "_id": 1});
        let records = flatten(&diff_documents(None, Some(&doc)).unwrap());
        assert_eq!(records, vec![ChangeRecord::added("$", doc)]);
    }

    #[test]
    fn missing_on_both_sides() {
        assert!(diff_documents(None, None).is_none());
        assert!(diff_documents(Some(&json!({})), Some(&json!({}))).is_none());
    }
}
