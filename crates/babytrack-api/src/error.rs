//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Client
//! errors echo their message; storage errors are logged and replaced with
//! a generic body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use babytrack_core::{ErrorClass, IngestError, StoreError};

/// Body text for every 5xx response.
const INTERNAL_MESSAGE: &str = "internal server error";

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was not a JSON object of the expected shape.
    #[error("invalid json body: {0}")]
    InvalidJson(String),

    /// The request was well-formed JSON but failed parsing or validation.
    #[error("{0}")]
    BadRequest(String),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err.class() {
            ErrorClass::BadInput => Self::BadRequest(err.to_string()),
            ErrorClass::StorageFailure => Self::Storage(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidJson(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Storage(detail) => {
                tracing::error!(error = %detail, "request failed in storage");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_owned(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
