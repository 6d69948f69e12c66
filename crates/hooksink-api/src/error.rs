//! API error taxonomy with HTTP status mapping.
//!
//! Every failure a handler can produce maps to exactly one variant here,
//! and every variant maps to exactly one HTTP response. Validation failures
//! are handled locally and translated directly; storage failures surface as
//! 500 and are logged, never silently dropped.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hooksink_core::CoreError;
use thiserror::Error;

/// Errors produced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown subscriber identifier or unmatched route.
    #[error("not found")]
    NotFound,

    /// Registration secret mismatch.
    #[error("unauthorized")]
    Unauthorized,

    /// Subscription-verification parameters failed validation.
    #[error("handshake rejected")]
    HandshakeRejected,

    /// Request body is not valid JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Underlying store unavailable or corrupted.
    #[error(transparent)]
    Storage(CoreError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            // Handshake rejection is a bare 400, empty body.
            Self::HandshakeRejected => StatusCode::BAD_REQUEST.into_response(),
            Self::MalformedPayload(reason) => {
                (StatusCode::BAD_REQUEST, format!("Malformed JSON payload: {reason}"))
                    .into_response()
            },
            Self::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn handshake_rejection_is_a_bare_400() {
        let response = ApiError::HandshakeRejected.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn core_not_found_converts_to_api_not_found() {
        let err = ApiError::from(CoreError::NotFound("subscriber x".to_string()));
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn core_database_error_converts_to_storage_failure() {
        let err = ApiError::from(CoreError::Database("connection lost".to_string()));
        assert!(matches!(err, ApiError::Storage(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
