use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("summary service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid service response: {0}")]
    InvalidResponse(String),

    #[error("output mode {0} is not supported by this service")]
    Unsupported(String),
}

pub type AiResult<T> = Result<T, AiError>;
