//! Error types for the pagedeck server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pagedeck_core::PagedeckError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("File too large (limit: {0} MB)")]
    UploadTooLarge(u64),

    #[error(transparent)]
    Pdf(#[from] PagedeckError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The UI is server-rendered HTML, so errors go out as plain text
        // the browser can show directly.
        let (status, message) = match &self {
            ApiError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Session not found: {}", id))
            }
            ApiError::SessionExpired => (StatusCode::GONE, "Session has expired".to_string()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::UploadTooLarge(limit) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File too large (limit: {} MB)", limit),
            ),
            ApiError::Pdf(e) => match e {
                PagedeckError::OperationError(msg) => {
                    tracing::error!("PDF operation failed: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "PDF operation failed".to_string(),
                    )
                }
                other => (StatusCode::BAD_REQUEST, other.to_string()),
            },
            ApiError::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "I/O error".to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
