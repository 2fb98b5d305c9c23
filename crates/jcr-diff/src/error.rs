//! Error types for the diff crate.

/// Errors that can occur during delta operations.
///
/// Lenient decoding never produces these; only strict decoding and parsing do.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A delta node had a shape the decoder would otherwise reinterpret or drop.
    #[error("malformed delta at {path:?}: {reason}")]
    MalformedDelta { path: String, reason: String },

    /// The delta text was not valid JSON.
    #[error("invalid delta JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
