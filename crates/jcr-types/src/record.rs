//! Flattened change records and the per-file deltas they come from.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One flattened change: a dotted path plus the value on each side.
///
/// `before` is `None` for additions and `after` is `None` for removals;
/// both are present for modifications. A JSON `null` on either side is
/// `Some(Value::Null)`, which is distinct from an absent side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl ChangeRecord {
    /// A value that exists only on the `after` side.
    pub fn added(path: impl Into<String>, after: Value) -> Self {
        Self {
            path: path.into(),
            before: None,
            after: Some(after),
        }
    }

    /// A value that exists only on the `before` side.
    pub fn removed(path: impl Into<String>, before: Value) -> Self {
        Self {
            path: path.into(),
            before: Some(before),
            after: None,
        }
    }

    /// A value present on both sides.
    pub fn modified(path: impl Into<String>, before: Value, after: Value) -> Self {
        Self {
            path: path.into(),
            before: Some(before),
            after: Some(after),
        }
    }

    /// Classify the record by which sides are present.
    pub fn kind(&self) -> ChangeKind {
        ChangeKind::from_sides(self.before.is_some(), self.after.is_some())
    }

    pub fn is_addition(&self) -> bool {
        self.before.is_none()
    }
}

/// The kind of a [`ChangeRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    /// Classify a change by which of its sides are present.
    pub fn from_sides(has_before: bool, has_after: bool) -> Self {
        match (has_before, has_after) {
            (false, _) => Self::Added,
            (true, false) => Self::Removed,
            (true, true) => Self::Modified,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// A structural delta for one changed file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDelta {
    pub file: String,
    #[serde(default)]
    pub diff: Value,
}

impl FileDelta {
    pub fn new(file: impl Into<String>, diff: Value) -> Self {
        Self {
            file: file.into(),
            diff,
        }
    }
}

/// The two commits a report compares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPair {
    pub before: String,
    pub after: String,
}

impl CommitPair {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Abbreviated `before..after` form for headings and logs.
    pub fn short(&self) -> String {
        format!("{}..{}", abbreviate(&self.before), abbreviate(&self.after))
    }
}

fn abbreviate(rev: &str) -> &str {
    match rev.char_indices().nth(7) {
        Some((idx, _)) => &rev[..idx],
        None => rev,
    }
}
