//! # Ceremony Engine
//!
//! The two-step challenge/response ceremonies against a WebAuthn
//! authenticator.
//!
//! ## Registration (binding a passkey)
//! 1. `registration::start_registration()` issues a challenge and returns
//!    creation options for `navigator.credentials.create()`.
//! 2. `registration::finish_registration()` consumes the challenge,
//!    verifies the attestation, and binds the credential to the user.
//!
//! ## Authentication (proving possession)
//! 1. `authentication::start_authentication()` issues a challenge scoped
//!    to the user's bound credential, for `navigator.credentials.get()`.
//! 2. `authentication::finish_authentication()` consumes the challenge
//!    and verifies the assertion against the stored public key.
//!
//! Both `finish` halves consume the challenge before verifying, so a
//! ceremony response can never be replayed: the second attempt finds the
//! slot empty and reports `verified: false`. Verification failures are
//! opaque by design — callers learn pass/fail, never which check failed.

pub mod authentication;
pub mod registration;
pub mod types;
