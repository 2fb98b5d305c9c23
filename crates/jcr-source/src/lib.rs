//! Repository sources for JSON Change Report.
//!
//! A [`RepositoryProvider`] supplies the two most recent commits and the raw
//! before/after text of every changed `.json` file. [`analyze`] parses those
//! blobs and turns them into per-file structural deltas.

pub mod analysis;
pub mod error;
pub mod git;
pub mod provider;

pub use analysis::{analyze, Analysis};
pub use error::{SourceError, SourceResult};
pub use git::GitCliProvider;
pub use provider::{is_json_file, FileBlobs, InMemoryProvider, RepositoryProvider};
