//! # Passkey Relying-Party Server
//!
//! A WebAuthn relying party for passwordless authentication. Users enroll
//! once, then run two-step challenge/response ceremonies — registration to
//! bind a passkey, authentication to prove possession of it.
//!
//! The crate is organized around the ceremony engine:
//! - `ceremony`: challenge issuance and verification for both ceremonies
//! - `db`: enrolled users, bound credentials, and the single-use
//!   challenge slots
//! - `handlers`: the HTTP transport over the engine
//! - `config` / `state` / `error`: environment config, shared state, and
//!   the application error type

pub mod ceremony;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use handlers::auth::{authenticate_finish, authenticate_start, register_finish, register_start};
use handlers::health::health_check;
use handlers::users::enroll;
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// Exposed from the library so integration tests can drive the full
/// HTTP surface without binding a socket.
pub fn create_router(state: AppState) -> Router {
    // The demo frontend is served from a different dev origin often
    // enough that permissive CORS is the practical default here; lock
    // this down per deployment.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Enrollment
        .route("/api/users", post(enroll))
        // Registration ceremony: issue challenge, then verify attestation
        .route("/api/auth/register/start", post(register_start))
        .route("/api/auth/register/finish", post(register_finish))
        // Authentication ceremony: issue challenge, then verify assertion
        .route("/api/auth/authenticate/start", post(authenticate_start))
        .route("/api/auth/authenticate/finish", post(authenticate_finish))
        // Demo frontend
        .fallback_service(ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
