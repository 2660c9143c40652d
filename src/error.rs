//! Error taxonomy for the Serial Verify Service.
//!
//! Expected outcomes (`MalformedRequest`, `InvalidCredential`,
//! `OriginRejected`) surface directly as structured JSON responses. Anything
//! unanticipated is wrapped in `Internal`, logged for operators, and
//! converted to a generic message so no internal detail reaches the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the verification engine and access filter.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The request body did not carry a string `serialKey`.
    #[error("serialKey must be provided in request body.")]
    MalformedRequest,

    /// The presented serial key did not match the configured secret.
    #[error("Invalid serial key.")]
    InvalidCredential,

    /// The request origin is not permitted by the configured policy.
    #[error("Origin not allowed.")]
    OriginRejected,

    /// Unexpected failure; details are sanitized in responses.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl VerifyError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest => StatusCode::BAD_REQUEST,
            Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::OriginRejected => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code used in log events.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::OriginRejected => "ORIGIN_REJECTED",
            Self::Internal(_) => "INTERNAL_FAILURE",
        }
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let message = match &self {
            VerifyError::Internal(cause) => {
                tracing::error!(error_code = self.code(), %cause, "unexpected failure");
                "Internal server error.".to_string()
            }
            expected => expected.to_string(),
        };

        (self.status_code(), Json(json!({ "error": message }))).into_response()
    }
}
