use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    #[error("repository must have at least 2 commits, found {found}")]
    NotEnoughCommits { found: u64 },

    #[error("invalid JSON in {file}: {source}")]
    InvalidJson {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected git output: {0}")]
    InvalidOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;
