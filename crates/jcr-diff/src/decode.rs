//! Delta decoding: walk a structural delta and emit path-qualified changes.
//!
//! A delta node is classified once into a [`DeltaNode`] and the walker
//! branches on that closed set. Whether a mapping is an array delta is decided
//! solely by the presence of [`ARRAY_MARKER`], before it is treated as an
//! object delta. Leaf tuples are classified by arity:
//!
//! | Tuple               | Meaning                                   |
//! |---------------------|-------------------------------------------|
//! | `[after]`           | addition                                  |
//! | `[before, after]`   | modification                              |
//! | `[before, 0, 0]`    | removal                                   |
//! | `[a, b, c, ..]`     | object delta: modification `a -> b`; array delta: dropped |
//!
//! Anything else contributes nothing.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DiffError, DiffResult};

/// Reserved key marking a delta mapping as array-index keyed.
pub const ARRAY_MARKER: &str = "_t";

/// Optional prefix on array-delta index keys, stripped when building paths.
pub const INDEX_PREFIX: char = '_';

/// Classification of one delta node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeltaNode<'a> {
    /// Object-keyed child deltas.
    Object(&'a Map<String, Value>),
    /// Index-keyed child deltas (mapping carries [`ARRAY_MARKER`]).
    Array(&'a Map<String, Value>),
    Added(&'a Value),
    Modified { before: &'a Value, after: &'a Value },
    Removed(&'a Value),
    /// Three or more elements whose positions 1 and 2 are not the removal sentinel.
    Unsentineled(&'a [Value]),
    /// Not a delta node; decodes to nothing.
    Unrecognized,
}

impl<'a> DeltaNode<'a> {
    /// Classify a delta node by shape.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key(ARRAY_MARKER) => Self::Array(map),
            Value::Object(map) => Self::Object(map),
            Value::Array(items) => match items.as_slice() {
                [after] => Self::Added(after),
                [before, after] => Self::Modified { before, after },
                [before, a, b, ..] if is_sentinel(a) && is_sentinel(b) => Self::Removed(before),
                [_, _, _, ..] => Self::Unsentineled(items.as_slice()),
                [] => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }
}

fn is_sentinel(value: &Value) -> bool {
    value.as_f64() == Some(0.0)
}

/// A decoded change that borrows its values from the delta.
#[derive(Clone, Debug, PartialEq)]
pub struct RawChange<'a> {
    pub path: String,
    pub before: Option<&'a Value>,
    pub after: Option<&'a Value>,
}

impl<'a> RawChange<'a> {
    fn added(path: String, after: &'a Value) -> Self {
        Self { path, before: None, after: Some(after) }
    }

    fn removed(path: String, before: &'a Value) -> Self {
        Self { path, before: Some(before), after: None }
    }

    fn modified(path: String, before: &'a Value, after: &'a Value) -> Self {
        Self { path, before: Some(before), after: Some(after) }
    }
}

/// Decode a delta leniently. Null and non-mapping roots yield no changes.
///
/// Changes are emitted depth-first, pre-order, in the iteration order of each
/// mapping.
pub fn decode(delta: &Value) -> Vec<RawChange<'_>> {
    let mut out = Vec::new();
    // Lenient decoding never rejects a node, so this cannot fail.
    let _ = Decoder::new(false).decode_root(delta, &mut out);
    out
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Decoder {
    strict: bool,
}

impl Decoder {
    pub(crate) fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub(crate) fn decode_root<'a>(
        &self,
        delta: &'a Value,
        out: &mut Vec<RawChange<'a>>,
    ) -> DiffResult<()> {
        match DeltaNode::classify(delta) {
            DeltaNode::Object(map) => self.walk_object(map, "", out),
            DeltaNode::Array(map) => self.walk_array(map, "", out),
            _ if delta.is_null() => Ok(()),
            _ => self.reject("", "delta root is not a mapping"),
        }
    }

    fn walk_object<'a>(
        &self,
        map: &'a Map<String, Value>,
        prefix: &str,
        out: &mut Vec<RawChange<'a>>,
    ) -> DiffResult<()> {
        for (key, value) in map {
            if key == ARRAY_MARKER {
                continue;
            }
            let path = join(prefix, key);
            match DeltaNode::classify(value) {
                DeltaNode::Object(child) => self.walk_object(child, &path, out)?,
                DeltaNode::Array(child) => self.walk_array(child, &path, out)?,
                DeltaNode::Added(after) => out.push(RawChange::added(path, after)),
                DeltaNode::Modified { before, after } => {
                    out.push(RawChange::modified(path, before, after))
                }
                DeltaNode::Removed(before) => out.push(RawChange::removed(path, before)),
                DeltaNode::Unsentineled(items) => {
                    self.reject(&path, "tuple of three or more without removal sentinel")?;
                    out.push(RawChange::modified(path, &items[0], &items[1]));
                }
                DeltaNode::Unrecognized => self.reject(&path, "value is not a delta node")?,
            }
        }
        Ok(())
    }

    fn walk_array<'a>(
        &self,
        map: &'a Map<String, Value>,
        prefix: &str,
        out: &mut Vec<RawChange<'a>>,
    ) -> DiffResult<()> {
        for (key, value) in map {
            if key == ARRAY_MARKER {
                continue;
            }
            let index = key.strip_prefix(INDEX_PREFIX).unwrap_or(key);
            let path = join(prefix, index);
            match DeltaNode::classify(value) {
                DeltaNode::Object(child) => self.walk_object(child, &path, out)?,
                DeltaNode::Array(child) => self.walk_array(child, &path, out)?,
                DeltaNode::Added(after) => out.push(RawChange::added(path, after)),
                DeltaNode::Modified { before, after } => {
                    out.push(RawChange::modified(path, before, after))
                }
                DeltaNode::Removed(before) => out.push(RawChange::removed(path, before)),
                DeltaNode::Unsentineled(_) => {
                    self.reject(&path, "array entry tuple without removal sentinel")?
                }
                DeltaNode::Unrecognized => self.reject(&path, "value is not a delta node")?,
            }
        }
        Ok(())
    }

    /// Strict mode fails on the node; lenient mode notes it and moves on.
    fn reject(&self, path: &str, reason: &str) -> DiffResult<()> {
        if self.strict {
            return Err(DiffError::MalformedDelta {
                path: path.to_string(),
                reason: reason.to_string(),
            });
        }
        debug!(path, reason, "lenient decode of irregular delta node");
        Ok(())
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}
