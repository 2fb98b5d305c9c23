//! Line-level diff of raw file text.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce hunks with
//! context lines, and renders them in unified format for the `git_diff`
//! context sent alongside change payloads.

use std::fmt::Write as _;

use similar::{ChangeTag, TextDiff};

const CONTEXT_LINES: usize = 3;

/// The result of diffing two texts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineDiff {
    pub hunks: Vec<Hunk>,
}

impl LineDiff {
    /// Returns `true` if the texts are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, LineChange::Added(_)))
            .count()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, LineChange::Removed(_)))
            .count()
    }

    fn lines(&self) -> impl Iterator<Item = &LineChange> {
        self.hunks.iter().flat_map(|h| &h.lines)
    }

    /// Render as a unified diff with `--- a/old` / `+++ b/new` headers.
    pub fn to_unified(&self, old_name: &str, new_name: &str) -> String {
        let mut out = String::new();
        if self.is_empty() {
            return out;
        }
        let _ = writeln!(out, "--- a/{old_name}");
        let _ = writeln!(out, "+++ b/{new_name}");
        for hunk in &self.hunks {
            let _ = writeln!(
                out,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );
            for line in &hunk.lines {
                let (mark, text) = match line {
                    LineChange::Context(t) => (' ', t),
                    LineChange::Added(t) => ('+', t),
                    LineChange::Removed(t) => ('-', t),
                };
                let _ = writeln!(out, "{mark}{text}");
            }
        }
        out
    }
}

/// A contiguous region of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk {
    /// 1-based start line in the old text.
    pub old_start: usize,
    pub old_count: usize,
    /// 1-based start line in the new text.
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<LineChange>,
}

/// A single line in a hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineChange {
    Context(String),
    Added(String),
    Removed(String),
}

/// Compute a line-by-line diff between two texts.
pub fn diff_text(old: &str, new: &str) -> LineDiff {
    if old == new {
        return LineDiff::default();
    }

    let text_diff = TextDiff::from_lines(old, new);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;

        let lines = group
            .iter()
            .flat_map(|op| text_diff.iter_changes(op))
            .map(|change| {
                let text = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Equal => LineChange::Context(text),
                    ChangeTag::Delete => LineChange::Removed(text),
                    ChangeTag::Insert => LineChange::Added(text),
                }
            })
            .collect();

        hunks.push(Hunk {
            old_start: old_range.start + 1,
            old_count: old_range.len(),
            new_start: new_range.start + 1,
            new_count: new_range.len(),
            lines,
        });
    }

    LineDiff { hunks }
}
