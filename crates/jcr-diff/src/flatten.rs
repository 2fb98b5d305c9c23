//! Flattening: owned change records from a delta.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use jcr_types::ChangeRecord;

use crate::decode::{decode, Decoder, RawChange};
use crate::error::DiffResult;

/// Decoder behaviour switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Fail on nodes that lenient decoding would reinterpret or drop.
    #[serde(default)]
    pub strict: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Flatten a delta into an ordered list of change records.
///
/// `None` and `null` mean "no changes". Every record owns a deep copy of its
/// values, so consumers may mutate them without touching the delta or any
/// other record.
pub fn flatten<'a>(delta: impl Into<Option<&'a Value>>) -> Vec<ChangeRecord> {
    match delta.into() {
        Some(delta) => decode(delta).into_iter().map(to_record).collect(),
        None => Vec::new(),
    }
}

/// Flatten with explicit options; only strict mode can fail.
pub fn try_flatten_with<'a>(
    delta: impl Into<Option<&'a Value>>,
    options: DecodeOptions,
) -> DiffResult<Vec<ChangeRecord>> {
    let Some(delta) = delta.into() else {
        return Ok(Vec::new());
    };
    let mut raw = Vec::new();
    Decoder::new(options.strict).decode_root(delta, &mut raw)?;
    Ok(raw.into_iter().map(to_record).collect())
}

/// Parse delta text. Empty input is the empty delta.
pub fn parse_delta(text: &str) -> DiffResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

fn to_record(change: RawChange<'_>) -> ChangeRecord {
    ChangeRecord {
        path: change.path,
        before: change.before.cloned(),
        after: change.after.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiffError;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn addition() {
        let records = flatten(&json!({"x": [5]}));
        assert_eq!(records, vec![ChangeRecord::added("x", json!(5))]);
    }

    #[test]
    fn modification() {
        let records = flatten(&json!({"x": [1, 2]}));
        assert_eq!(records, vec![ChangeRecord::modified("x", json!(1), json!(2))]);
    }

    #[test]
    fn removal_and_sentinel_mismatch() {
        assert_eq!(
            flatten(&json!({"x": [9, 0, 0]})),
            vec![ChangeRecord::removed("x", json!(9))]
        );
        assert_eq!(
            flatten(&json!({"x": [9, 1, 2]})),
            vec![ChangeRecord::modified("x", json!(9), json!(1))]
        );
    }

    #[test]
    fn array_marker_paths() {
        let expected = vec![ChangeRecord::added("items.1", json!(7))];
        assert_eq!(flatten(&json!({"items": {"_t": "a", "1": [7]}})), expected);
        assert_eq!(flatten(&json!({"items": {"_t": "a", "_1": [7]}})), expected);
    }

    #[test]
    fn nested_objects() {
        assert_eq!(
            flatten(&json!({"a": {"b": {"c": [1, 2]}}})),
            vec![ChangeRecord::modified("a.b.c", json!(1), json!(2))]
        );
    }

    #[test]
    fn absent_delta_is_empty() {
        assert!(flatten(None::<&Value>).is_empty());
        assert!(flatten(&Value::Null).is_empty());
        assert!(try_flatten_with(None::<&Value>, DecodeOptions::strict()).unwrap().is_empty());
    }

    #[test]
    fn records_are_independent_copies() {
        let delta = json!({"cfg": [{"port": 80}]});
        let mut records = flatten(&delta);
        if let Some(Value::Object(map)) = records[0].after.as_mut() {
            map.insert("port".into(), json!(443));
        }
        assert_eq!(delta["cfg"][0]["port"], json!(80));
        assert_eq!(flatten(&delta)[0].after, Some(json!({"port": 80})));
    }

    #[test]
    fn explicit_null_values_survive() {
        let records = flatten(&json!({"a": [null], "b": [null, 0, 0]}));
        assert_eq!(records[0], ChangeRecord::added("a", Value::Null));
        assert_eq!(records[1], ChangeRecord::removed("b", Value::Null));
    }

    #[test]
    fn strict_mode_rejects_degraded_tuple() {
        let delta = json!({"x": [9, 1, 2]});
        let err = try_flatten_with(&delta, DecodeOptions::strict()).unwrap_err();
        assert!(matches!(err, DiffError::MalformedDelta { ref path, .. } if path == "x"));

        let lenient = try_flatten_with(&delta, DecodeOptions::default()).unwrap();
        assert_eq!(lenient, flatten(&delta));
    }

    #[test]
    fn strict_mode_accepts_well_formed_delta() {
        let delta = json!({"a": [1], "b": {"_t": "a", "_0": [2, 0, 0]}});
        let records = try_flatten_with(&delta, DecodeOptions::strict()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn parse_delta_handles_blank_and_invalid_input() {
        assert_eq!(parse_delta("  \n").unwrap(), Value::Null);
        assert_eq!(parse_delta(r#"{"x":[1]}"#).unwrap(), json!({"x": [1]}));
        assert!(matches!(parse_delta("{"), Err(DiffError::Parse(_))));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: DecodeOptions = serde_json::from_value(json!({})).unwrap();
        assert!(!opts.strict);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            (-3i64..3).prop_map(Value::from),
            "[a-z_]{0,3}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(("[_a-z0-9]{1,3}", inner), 0..4)
                    .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn flatten_is_idempotent(delta in arb_json()) {
            let first = flatten(&delta);
            let second = flatten(&delta);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn lenient_flatten_never_fails(delta in arb_json()) {
            let records = try_flatten_with(&delta, DecodeOptions::default());
            prop_assert!(records.is_ok());
        }

        #[test]
        fn every_record_has_a_side(delta in arb_json()) {
            for record in flatten(&delta) {
                prop_assert!(record.before.is_some() || record.after.is_some());
            }
        }
    }
}
