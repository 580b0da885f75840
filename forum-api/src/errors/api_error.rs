//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use forum_repository::ForumError;
use serde::Serialize;
use tracing::error;

/// Body of every error response: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by request handlers.
///
/// Messages are sent to the caller verbatim. Store failures never carry
/// their details; they are logged and answered with a fixed per-route message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Map a service error for a route.
    ///
    /// `Operation` failures are logged with the route and become
    /// `Internal(failure_message)`.
    pub fn from_forum(err: ForumError, route: &'static str, failure_message: &'static str) -> Self {
        match err {
            ForumError::Validation(msg) => Self::BadRequest(msg),
            ForumError::Unauthorized(msg) => Self::Unauthorized(msg),
            ForumError::Operation(store_error) => {
                error!(route, error = %store_error, "{}", failure_message);
                Self::Internal(failure_message)
            }
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
