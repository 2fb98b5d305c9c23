//! Foundation types for JSON Change Report (JCR).
//!
//! This crate provides the value types passed between the decoding, report,
//! source, and AI crates. Every other JCR crate depends on `jcr-types`.
//!
//! # Key Types
//!
//! - [`ChangeRecord`] -- One flattened `(path, before, after)` change
//! - [`FileDelta`] -- A structural delta tagged with the file it came from
//! - [`Table`] -- Named, column-ordered rows of rendered cells
//! - [`FootnoteEntry`] -- Full text of a cell that was truncated at render time
//! - [`CommitPair`] -- The two commits a report compares

pub mod error;
pub mod footnote;
pub mod record;
pub mod table;

pub use error::TypeError;
pub use footnote::{FootnoteColumn, FootnoteEntry};
pub use record::{ChangeKind, ChangeRecord, CommitPair, FileDelta};
pub use table::Table;
