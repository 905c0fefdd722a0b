use crate::ceremony::types::*;
use crate::ceremony::{authentication, registration};
use crate::error::AppResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

// Registration ceremony endpoints

pub async fn register_start(
    State(state): State<AppState>,
    Json(req): Json<RegistrationStartRequest>,
) -> AppResult<Json<Value>> {
    let ccr = registration::start_registration(&state, &req.user_id).await?;

    Ok(Json(json!(ccr)))
}

pub async fn register_finish(
    State(state): State<AppState>,
    Json(req): Json<RegistrationFinishRequest>,
) -> AppResult<Json<Value>> {
    let verified = registration::finish_registration(&state, &req.user_id, &req.credential).await?;

    Ok(Json(json!({ "verified": verified })))
}

// Authentication ceremony endpoints

pub async fn authenticate_start(
    State(state): State<AppState>,
    Json(req): Json<AuthenticationStartRequest>,
) -> AppResult<Json<Value>> {
    let rcr = authentication::start_authentication(&state, &req.user_id).await?;

    Ok(Json(json!(rcr)))
}

pub async fn authenticate_finish(
    State(state): State<AppState>,
    Json(req): Json<AuthenticationFinishRequest>,
) -> AppResult<Json<Value>> {
    let verified =
        authentication::finish_authentication(&state, &req.user_id, &req.credential).await?;

    if verified {
        Ok(Json(json!({
            "verified": true,
            "user_id": req.user_id
        })))
    } else {
        Ok(Json(json!({ "verified": false })))
    }
}
