//! # Enrollment Handler
//!
//! Creates users ahead of their first registration ceremony. The
//! enrollment secret is hashed with Argon2id here, at the transport
//! boundary — the ceremony engine never sees it.

use crate::ceremony::types::EnrollRequest;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Enroll a new user.
///
/// ## Route
/// POST /api/users
///
/// ## Response
/// ```json
/// { "id": "550e8400-e29b-41d4-a716-446655440000" }
/// ```
///
/// The returned id is the handle for every later ceremony call.
pub async fn enroll(
    State(state): State<AppState>,
    Json(req): Json<EnrollRequest>,
) -> AppResult<Json<Value>> {
    if req.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username must not be empty".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let secret_hash = Argon2::default()
        .hash_password(req.secret.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Secret hashing failed: {}", e)))?
        .to_string();

    let user = users::create_user(&state.db, &req.username, &secret_hash).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user enrolled");

    Ok(Json(json!({ "id": user.id })))
}
