//! Error types for the report crate.

/// Errors that can occur while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A render setting is out of range.
    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    /// A table violated its own column schema.
    #[error("table {table:?}: {source}")]
    Table {
        table: String,
        #[source]
        source: jcr_types::TypeError,
    },
}

/// Convenience alias for report results.
pub type ReportResult<T> = Result<T, ReportError>;
