//! # Authentication Ceremony
//!
//! Server side of proving possession of a previously bound passkey. The
//! bound credential forms the allow-list baked into the challenge, so an
//! assertion produced for one user's challenge cannot verify against
//! another's even if the raw challenge bytes were to coincide.

use crate::db::models::CeremonyKind;
use crate::db::{challenges, credentials, users};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use serde_json::Value;
use webauthn_rs::prelude::*;

/// Begin the authentication ceremony.
///
/// Requires an enrolled user with a bound credential; the credential
/// becomes the allow-list for the assertion. Issues a fresh challenge
/// into the user's authentication slot, replacing any outstanding one.
///
/// ## Errors
/// - `NotFound`: the user has not been enrolled
/// - `NoCredential`: the user never completed a registration ceremony
pub async fn start_authentication(
    state: &AppState,
    user_id: &str,
) -> AppResult<RequestChallengeResponse> {
    let user = users::find_by_id(&state.db, user_id).await?;

    let stored = credentials::find_by_user_id(&state.db, &user.id)
        .await?
        .ok_or_else(|| {
            AppError::NoCredential(format!("No passkey bound for user '{}'", user.id))
        })?;

    let passkey: Passkey = serde_json::from_slice(&stored.passkey)?;

    let (rcr, auth_state) = state.webauthn.start_passkey_authentication(&[passkey])?;

    let state_bytes = serde_json::to_vec(&auth_state)?;

    challenges::issue(
        &state.db,
        &user.id,
        CeremonyKind::Authentication,
        &state_bytes,
        state.challenge_ttl_secs,
    )
    .await?;

    Ok(rcr)
}

/// Complete the authentication ceremony.
///
/// Consumes the user's authentication challenge first, then verifies the
/// assertion's signature against the bound credential's public key, the
/// consumed challenge, the expected origin and RP id, and the signature
/// counter (a regressing counter indicates a cloned authenticator and is
/// rejected by the verifier).
///
/// On success the stored credential's counter and last-used marker are
/// advanced. Non-verifying outcomes all surface as `false`, same as
/// registration.
///
/// ## Errors
/// - `NotFound`: the user has not been enrolled
/// - `NoCredential`: no passkey is bound to the user
/// - `Database` / `Serialization`: the stores failed mid-ceremony
pub async fn finish_authentication(
    state: &AppState,
    user_id: &str,
    credential: &Value,
) -> AppResult<bool> {
    let user = users::find_by_id(&state.db, user_id).await?;

    let stored = credentials::find_by_user_id(&state.db, &user.id)
        .await?
        .ok_or_else(|| {
            AppError::NoCredential(format!("No passkey bound for user '{}'", user.id))
        })?;

    let Some(state_bytes) =
        challenges::consume(&state.db, &user.id, CeremonyKind::Authentication).await?
    else {
        tracing::debug!(user_id = %user.id, "no outstanding authentication challenge");
        return Ok(false);
    };

    let auth_state: PasskeyAuthentication = serde_json::from_slice(&state_bytes)?;

    let auth_credential: PublicKeyCredential = match serde_json::from_value(credential.clone()) {
        Ok(cred) => cred,
        Err(e) => {
            tracing::debug!(user_id = %user.id, error = %e, "malformed assertion payload");
            return Ok(false);
        }
    };

    let auth_result = match state
        .webauthn
        .finish_passkey_authentication(&auth_credential, &auth_state)
    {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(user_id = %user.id, error = %e, "authentication verification failed");
            return Ok(false);
        }
    };

    // Fold the advanced counter back into the stored passkey so the next
    // ceremony starts from the authenticator's latest state.
    let mut passkey: Passkey = serde_json::from_slice(&stored.passkey)?;
    passkey.update_credential(&auth_result);
    let passkey_bytes = serde_json::to_vec(&passkey)?;

    credentials::update_after_authentication(
        &state.db,
        &user.id,
        &passkey_bytes,
        auth_result.counter(),
    )
    .await?;

    tracing::info!(user_id = %user.id, counter = auth_result.counter(), "passkey authenticated");

    Ok(true)
}
