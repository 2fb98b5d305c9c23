//! Report building for JSON Change Report.
//!
//! Turns per-file structural deltas into named tables, and lays those tables
//! out as a paginated document with truncated cells and a footnote appendix.
//!
//! # Key Types
//!
//! - [`TableMode`] / [`build_tables`] -- Per-file full or added-only tables
//! - [`Report`] -- Title, commit pair, and tables for one analysis
//! - [`FootnoteTracker`] / [`render_cell`] -- Truncation with footnotes
//! - [`RenderConfig`] / [`RenderedDocument`] -- Paginated document model

pub mod builder;
pub mod cell;
pub mod error;
pub mod render;

pub use builder::{
    added_only_table, added_table, build_tables, group_by_file, per_file_added_tables,
    per_file_tables, stringify_value, Report, TableMode, ADDED_TABLE_NAME, NEW_VALUE_COLUMN,
    OLD_VALUE_COLUMN, PATH_COLUMN,
};
pub use cell::{dequote, render_cell, CellContext, FootnoteTracker, ELLIPSIS};
pub use error::{ReportError, ReportResult};
pub use render::{render_document, Page, RenderConfig, RenderMode, RenderedCell, RenderedDocument};
