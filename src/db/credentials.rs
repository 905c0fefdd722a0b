//! # Credential Bindings
//!
//! CRUD for the passkey credential bound to each user. The table is keyed
//! by user id, so a user holds at most one credential and re-registering
//! replaces the previous binding outright (no merge).

use crate::db::models::BoundCredential;
use crate::error::AppResult;
use chrono::Utc;
use sqlx::SqlitePool;

/// Bind a credential to a user, replacing any prior binding.
///
/// Called only after a registration ceremony has verified. Rebinding
/// resets the counter and the last-used marker along with the key
/// material, since the old credential is no longer trusted.
pub async fn bind(
    pool: &SqlitePool,
    user_id: &str,
    credential_id: &str,
    passkey: &[u8],
    counter: u32,
) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO bound_credentials (user_id, credential_id, passkey, counter, created_at, last_used_at)
         VALUES (?, ?, ?, ?, ?, NULL)
         ON CONFLICT (user_id) DO UPDATE
         SET credential_id = excluded.credential_id,
             passkey = excluded.passkey,
             counter = excluded.counter,
             created_at = excluded.created_at,
             last_used_at = NULL",
    )
    .bind(user_id)
    .bind(credential_id)
    .bind(passkey)
    .bind(counter as i64)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the credential bound to a user, if any.
pub async fn find_by_user_id(
    pool: &SqlitePool,
    user_id: &str,
) -> AppResult<Option<BoundCredential>> {
    let credential = sqlx::query_as::<_, BoundCredential>(
        "SELECT * FROM bound_credentials WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(credential)
}

/// Persist the post-authentication credential state: the refreshed
/// passkey blob, the advanced signature counter, and the last-used
/// timestamp.
pub async fn update_after_authentication(
    pool: &SqlitePool,
    user_id: &str,
    passkey: &[u8],
    counter: u32,
) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE bound_credentials
         SET passkey = ?, counter = ?, last_used_at = ?
         WHERE user_id = ?",
    )
    .bind(passkey)
    .bind(counter as i64)
    .bind(&now)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
