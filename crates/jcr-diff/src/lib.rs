//! Delta engine for JSON Change Report.
//!
//! Decodes compact structural deltas (the `[after]` / `[before, after]` /
//! `[before, 0, 0]` tuple encoding with `"_t": "a"` array nodes) into flat
//! change records, and produces such deltas from two JSON documents.
//!
//! # Key Types
//!
//! - [`DeltaNode`] -- Classification of a single delta node
//! - [`RawChange`] -- A decoded change borrowing from the delta
//! - [`flatten`] / [`try_flatten_with`] -- Owned [`ChangeRecord`] lists
//! - [`compute_delta`] / [`diff_documents`] -- Delta generation
//! - [`LineDiff`] / [`Hunk`] / [`LineChange`] -- Line-level text diff
//!
//! [`ChangeRecord`]: jcr_types::ChangeRecord

pub mod decode;
pub mod delta;
pub mod error;
pub mod flatten;
pub mod text_diff;

pub use decode::{decode, DeltaNode, RawChange, ARRAY_MARKER, INDEX_PREFIX};
pub use delta::{compute_delta, diff_documents, ROOT_KEY};
pub use error::{DiffError, DiffResult};
pub use flatten::{flatten, parse_delta, try_flatten_with, DecodeOptions};
pub use text_diff::{diff_text, Hunk, LineChange, LineDiff};
