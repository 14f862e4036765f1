use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::poll::PollError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Poll(#[from] PollError),
    /// Path segment that does not parse as a question id.
    #[error("no such page: {0}")]
    Path(#[from] PathRejection),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Failures while bringing the server up.
#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),
    #[error("templates failed to compile: {0}")]
    Templates(#[from] minijinja::Error),
    #[error("http server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Poll(PollError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Path(PathRejection::FailedToDeserializePathParams(_)) => StatusCode::NOT_FOUND,
            Self::Poll(PollError::Store(_)) | Self::Path(_) | Self::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = if status == StatusCode::NOT_FOUND {
            tracing::debug!(error = %self, "not found");
            ("not_found", self.to_string())
        } else {
            tracing::error!(error = %self, "request failed");
            ("internal_error", "internal server error".to_owned())
        };

        let body = ErrorEnvelope {
            error: ErrorBody { code, message },
        };
        (status, Json(body)).into_response()
    }
}
