//! # Registration Ceremony
//!
//! Server side of binding a new passkey to an enrolled user.
//!
//! The two halves are separate HTTP round-trips because the authenticator
//! interaction happens on the client in between; the single-use challenge
//! slot is the only state carried across that gap.

use crate::db::models::CeremonyKind;
use crate::db::{challenges, credentials, users};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use base64::prelude::*;
use serde_json::Value;
use webauthn_rs::prelude::*;

/// Begin the registration ceremony for an enrolled user.
///
/// Issues a fresh challenge into the user's registration slot (replacing
/// any outstanding one) and returns the creation options the client feeds
/// to `navigator.credentials.create()`.
///
/// ## Errors
/// - `NotFound`: the user has not been enrolled
/// - `WebAuthn` / `Serialization`: options could not be built
pub async fn start_registration(
    state: &AppState,
    user_id: &str,
) -> AppResult<CreationChallengeResponse> {
    let user = users::find_by_id(&state.db, user_id).await?;

    let user_uuid = Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Internal("Invalid user UUID".to_string()))?;

    // No excluded credentials: a user re-registering simply replaces the
    // existing binding once the new ceremony verifies.
    let (ccr, reg_state) = state.webauthn.start_passkey_registration(
        user_uuid,
        &user.username,
        &user.username,
        None,
    )?;

    // The serialized PasskeyRegistration carries the challenge bytes plus
    // the expected RP id and origin for the later verification.
    let state_bytes = serde_json::to_vec(&reg_state)?;

    challenges::issue(
        &state.db,
        &user.id,
        CeremonyKind::Registration,
        &state_bytes,
        state.challenge_ttl_secs,
    )
    .await?;

    Ok(ccr)
}

/// Complete the registration ceremony.
///
/// Consumes the user's registration challenge first — the challenge is
/// spent by this attempt whether or not verification passes, so the same
/// attestation can never be submitted twice. Then verifies that the
/// attestation binds the consumed challenge, the expected origin, and the
/// expected RP id, and on success binds the resulting credential to the
/// user (replacing any prior binding).
///
/// Returns `false` for every non-verifying outcome — missing or expired
/// challenge, unparseable payload, or failed cryptographic checks — so
/// callers cannot distinguish which check rejected the attempt.
///
/// ## Errors
/// - `NotFound`: the user has not been enrolled
/// - `Database` / `Serialization`: the stores failed mid-ceremony
pub async fn finish_registration(
    state: &AppState,
    user_id: &str,
    credential: &Value,
) -> AppResult<bool> {
    let user = users::find_by_id(&state.db, user_id).await?;

    let Some(state_bytes) =
        challenges::consume(&state.db, &user.id, CeremonyKind::Registration).await?
    else {
        tracing::debug!(user_id = %user.id, "no outstanding registration challenge");
        return Ok(false);
    };

    // Server-side state; a decode failure here is an internal fault, not
    // a client outcome.
    let reg_state: PasskeyRegistration = serde_json::from_slice(&state_bytes)?;

    // A client payload that does not even parse gets the same opaque
    // outcome as a failed signature check.
    let reg_credential: RegisterPublicKeyCredential =
        match serde_json::from_value(credential.clone()) {
            Ok(cred) => cred,
            Err(e) => {
                tracing::debug!(user_id = %user.id, error = %e, "malformed attestation payload");
                return Ok(false);
            }
        };

    let passkey = match state
        .webauthn
        .finish_passkey_registration(&reg_credential, &reg_state)
    {
        Ok(passkey) => passkey,
        Err(e) => {
            tracing::debug!(user_id = %user.id, error = %e, "registration verification failed");
            return Ok(false);
        }
    };

    let passkey_bytes = serde_json::to_vec(&passkey)?;
    let credential_id = BASE64_URL_SAFE_NO_PAD.encode(passkey.cred_id().as_slice());

    credentials::bind(&state.db, &user.id, &credential_id, &passkey_bytes, 0).await?;

    tracing::info!(user_id = %user.id, credential_id = %credential_id, "passkey bound");

    Ok(true)
}
