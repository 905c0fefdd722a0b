//! # Challenge Ledger
//!
//! At most one outstanding challenge per (user, ceremony kind). Issuing
//! into an occupied slot overwrites it, which invalidates the previous
//! challenge. Consuming a slot reads and clears it in a single atomic
//! statement, so a challenge can never be redeemed twice — the sole
//! replay defense across the client-side gap between the two ceremony
//! steps.

use crate::db::models::{CeremonyChallenge, CeremonyKind};
use crate::error::{AppError, AppResult};
use chrono::Utc;
use sqlx::SqlitePool;

/// Issue a fresh challenge for the given slot, replacing any prior
/// unconsumed challenge for the same (user, kind).
pub async fn issue(
    pool: &SqlitePool,
    user_id: &str,
    kind: CeremonyKind,
    state: &[u8],
    ttl_secs: u64,
) -> AppResult<()> {
    let challenge =
        CeremonyChallenge::new(user_id.to_string(), kind, state.to_vec(), ttl_secs);

    sqlx::query(
        "INSERT INTO ceremony_challenges (user_id, ceremony, state, created_at, expires_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (user_id, ceremony) DO UPDATE
         SET state = excluded.state,
             created_at = excluded.created_at,
             expires_at = excluded.expires_at",
    )
    .bind(&challenge.user_id)
    .bind(&challenge.ceremony)
    .bind(&challenge.state)
    .bind(&challenge.created_at)
    .bind(&challenge.expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read and clear the slot in one statement. Returns `None` if no
/// challenge was outstanding (never issued, already consumed, or
/// overwritten) or if the slot had expired.
///
/// The row is removed even when it turns out to be expired, so a stale
/// challenge cannot linger in the slot.
pub async fn consume(
    pool: &SqlitePool,
    user_id: &str,
    kind: CeremonyKind,
) -> AppResult<Option<Vec<u8>>> {
    let row = sqlx::query_as::<_, (Vec<u8>, String)>(
        "DELETE FROM ceremony_challenges
         WHERE user_id = ? AND ceremony = ?
         RETURNING state, expires_at",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .fetch_optional(pool)
    .await?;

    let Some((state, expires_at)) = row else {
        return Ok(None);
    };

    let expires_at = chrono::DateTime::parse_from_rfc3339(&expires_at)
        .map_err(|_| AppError::Internal("Invalid expiration timestamp".to_string()))?;

    if Utc::now() > expires_at {
        tracing::debug!(user_id, ceremony = kind.as_str(), "challenge expired");
        return Ok(None);
    }

    Ok(Some(state))
}

/// Remove expired slots. Run periodically so abandoned ceremonies do not
/// accumulate.
pub async fn cleanup_expired(pool: &SqlitePool) -> AppResult<u64> {
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query("DELETE FROM ceremony_challenges WHERE expires_at < ?")
        .bind(&now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
