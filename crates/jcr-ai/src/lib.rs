//! AI summary contract for JSON Change Report.
//!
//! The summarization service is external. This crate owns what crosses the
//! boundary: the request payload, every `result` shape the service may send
//! back, the normalization it applies, and how its output is merged with the
//! deterministic change tables.

pub mod client;
pub mod error;
pub mod merge;
pub mod output;
pub mod request;
pub mod tables;

pub use client::{AiConfig, HttpSummaryService, LocalSummaryService, SummaryService};
pub use error::{AiError, AiResult};
pub use merge::{merge_with_tables, MergedReport};
pub use output::{normalize_file, normalize_table, parse_model_text, AiBody, AiOutput, FileSummary};
pub use request::{flat_changes, AiPayload, AiRequest, FlatChange, OutputMode};
pub use tables::{changes_tables, deterministic_output, template_tables};
