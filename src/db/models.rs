//! # Database Models
//!
//! Row types for the three tables backing the server: enrolled users,
//! bound passkey credentials, and outstanding ceremony challenges.
//!
//! Timestamps are stored as RFC3339 text, which is what SQLite handles
//! most naturally and keeps the rows human-readable.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An enrolled user.
///
/// Created once at enrollment. The only later mutation is the credential
/// binding, which lives in its own table (`bound_credentials`).
///
/// The enrollment secret is hashed with Argon2id before it reaches this
/// struct; the plaintext is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier (UUID v4), generated at enrollment, immutable.
    pub id: String,

    /// Human-readable handle. Uniqueness is not enforced by the store.
    pub username: String,

    /// Argon2id PHC-format hash of the enrollment secret.
    pub secret_hash: String,

    /// When the user was enrolled (RFC3339).
    pub created_at: String,

    /// When the user row was last updated (RFC3339).
    pub updated_at: String,
}

impl User {
    /// Create a new user with a generated id and current timestamps.
    pub fn new(username: String, secret_hash: String) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            username,
            secret_hash,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A passkey credential bound to a user after a successful registration
/// ceremony.
///
/// Only the public half of the credential is ever stored. The `passkey`
/// blob is the serialized `webauthn_rs` `Passkey` (public key plus
/// metadata); the signature counter is mirrored in its own column so it
/// can be inspected without deserializing the blob.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BoundCredential {
    /// Owning user. One credential per user: binding replaces any prior row.
    pub user_id: String,

    /// Credential identifier reported by the authenticator.
    pub credential_id: String,

    /// Serialized `Passkey` (public key + metadata), stored as a BLOB.
    pub passkey: Vec<u8>,

    /// Signature counter from the most recent successful ceremony.
    pub counter: i64,

    /// When the credential was bound (RFC3339).
    pub created_at: String,

    /// When the credential last completed an authentication (RFC3339).
    pub last_used_at: Option<String>,
}

/// Which of the two ceremonies a challenge slot belongs to.
///
/// The kinds are independent slots: an outstanding registration challenge
/// does not interfere with an authentication challenge for the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyKind {
    Registration,
    Authentication,
}

impl CeremonyKind {
    /// Text form used as the slot key in `ceremony_challenges`.
    pub fn as_str(self) -> &'static str {
        match self {
            CeremonyKind::Registration => "registration",
            CeremonyKind::Authentication => "authentication",
        }
    }
}

/// An outstanding, unconsumed ceremony challenge.
///
/// The `state` blob is the serialized `webauthn_rs` server-side ceremony
/// state (`PasskeyRegistration` or `PasskeyAuthentication` depending on
/// the kind). It embeds the random challenge bytes together with the
/// expected origin and relying-party id, so the consumed state is all the
/// verifier needs to check freshness and binding.
///
/// Lifecycle: written by the `start` half of a ceremony (overwriting any
/// prior slot for the same user and kind), removed by the `finish` half
/// regardless of the verification outcome.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CeremonyChallenge {
    /// User the challenge was issued to.
    pub user_id: String,

    /// Ceremony kind, `registration` or `authentication`.
    pub ceremony: String,

    /// Serialized verifier state for the pending ceremony.
    pub state: Vec<u8>,

    /// When the challenge was issued (RFC3339).
    pub created_at: String,

    /// When the challenge stops being consumable (RFC3339).
    pub expires_at: String,
}

impl CeremonyChallenge {
    /// Create a challenge row expiring `ttl_secs` from now.
    pub fn new(user_id: String, kind: CeremonyKind, state: Vec<u8>, ttl_secs: u64) -> Self {
        let now = Utc::now();
        let expires = now + chrono::Duration::seconds(ttl_secs as i64);

        Self {
            user_id,
            ceremony: kind.as_str().to_string(),
            state,
            created_at: now.to_rfc3339(),
            expires_at: expires.to_rfc3339(),
        }
    }
}
