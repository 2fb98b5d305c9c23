use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use jcr_ai::AiError;
use jcr_source::SourceError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("malformed delta: {0}")]
    Diff(#[from] jcr_diff::DiffError),

    #[error("report error: {0}")]
    Report(#[from] jcr_report::ReportError),

    #[error("repository error: {0}")]
    Source(#[from] SourceError),

    #[error("summary service error: {0}")]
    Ai(#[from] AiError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ServerError {
    /// 400 for bad input, 502 for failing collaborators, 500 for the rest.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Diff(_) | Self::Report(_) => StatusCode::BAD_REQUEST,
            Self::Source(SourceError::NotEnoughCommits { .. }) => StatusCode::BAD_REQUEST,
            Self::Ai(AiError::Unsupported(_)) => StatusCode::BAD_REQUEST,
            Self::Source(_) | Self::Ai(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
