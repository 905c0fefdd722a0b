//! # Ceremony API Types
//!
//! Request payloads for the enrollment and ceremony endpoints.
//!
//! Ceremony responses from the browser arrive as `serde_json::Value` and
//! are handed to `webauthn-rs` for parsing, so the full nested WebAuthn
//! structures never need to be restated here.

use serde::{Deserialize, Serialize};

/// Request to enroll a new user.
///
/// ```json
/// { "username": "alice", "secret": "correct horse battery staple" }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct EnrollRequest {
    /// Human-readable handle for the new user.
    pub username: String,
    /// Enrollment secret. Hashed with Argon2id before storage.
    pub secret: String,
}

/// Request to begin the registration ceremony for an enrolled user.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationStartRequest {
    /// Id returned by enrollment.
    pub user_id: String,
}

/// Request to complete the registration ceremony.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationFinishRequest {
    pub user_id: String,
    /// The attestation produced by `navigator.credentials.create()`.
    pub credential: serde_json::Value,
}

/// Request to begin the authentication ceremony.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationStartRequest {
    pub user_id: String,
}

/// Request to complete the authentication ceremony.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationFinishRequest {
    pub user_id: String,
    /// The assertion produced by `navigator.credentials.get()`.
    pub credential: serde_json::Value,
}
