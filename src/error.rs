//! # Error Handling
//!
//! Application error type and its mapping onto HTTP responses.
//!
//! Two deliberate asymmetries in what callers get to see:
//! - Ceremony verification failures are NOT errors. They surface as
//!   `verified: false` in the ceremony modules, with a single opaque
//!   outcome that does not reveal which check failed.
//! - Precondition failures (unknown user, no bound credential) ARE
//!   errors, and the two are kept distinct.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// SQLx store errors. Fatal to the request, not the process.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Errors from the WebAuthn verifier while *building* ceremony
    /// options. Verification-time failures never take this path.
    #[error("WebAuthn error: {0}")]
    WebAuthn(#[from] webauthn_rs::prelude::WebauthnError),

    /// JSON (de)serialization of server-side state failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Referenced user does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User exists but has no bound credential. Kept distinct from
    /// `NotFound` so callers can tell "enroll first" from "register a
    /// passkey first".
    #[error("No credential: {0}")]
    NoCredential(String),

    /// Client sent invalid data.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unexpected internal failure.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Detailed errors go to the log; the response body carries a
        // message safe to show to clients.
        let (status, error_message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::WebAuthn(e) => {
                tracing::error!("WebAuthn error: {:?}", e);
                (StatusCode::BAD_REQUEST, "Authentication error".to_string())
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Serialization error".to_string(),
                )
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::NoCredential(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Convenience alias for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
