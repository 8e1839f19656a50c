//! Handler errors and their HTTP responses.
//!
//! Client mistakes come back as 400/404 with a readable message. Server faults
//! are reported to Sentry and answered with a bare 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use showroom_core::ValidationError;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submitted product data is malformed.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The named resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
                // Details stay in the logs
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
