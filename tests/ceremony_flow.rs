//! HTTP integration tests for the ceremony endpoints.
//!
//! Driven through the full router with an in-memory SQLite store. The
//! cryptographic happy path needs a real authenticator and is out of
//! reach here; what these tests pin down is the ceremony protocol around
//! it — enrollment, challenge issuance, single-use consumption, and the
//! opaque pass/fail surface.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use passkey_rp::create_router;
use passkey_rp::state::AppState;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;
use webauthn_rs::prelude::Url;
use webauthn_rs::WebauthnBuilder;

/// App state over a fresh in-memory database.
async fn test_state() -> AppState {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("migrations");

    let rp_origin = Url::parse("http://localhost:8080").expect("origin");
    let webauthn = WebauthnBuilder::new("localhost", &rp_origin)
        .expect("webauthn builder")
        .rp_name("Test RP")
        .build()
        .expect("webauthn");

    AppState {
        db,
        webauthn: Arc::new(webauthn),
        challenge_ttl_secs: 300,
    }
}

async fn test_app() -> Router {
    create_router(test_state().await)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

async fn enroll(app: &Router, username: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/users",
        json!({ "username": username, "secret": "hunter2hunter2" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().expect("user id").to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn enrollment_returns_an_id_and_nothing_else() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/users",
        json!({ "username": "alice", "secret": "correct horse" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["id"].as_str().expect("id").is_empty());
    assert_eq!(body.as_object().expect("object").len(), 1);
}

#[tokio::test]
async fn enrollment_rejects_blank_usernames() {
    let app = test_app().await;

    let (status, _) = post_json(
        &app,
        "/api/users",
        json!({ "username": "   ", "secret": "s" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn enrollment_secret_is_stored_hashed() {
    let state = test_state().await;
    let app = create_router(state.clone());

    enroll(&app, "alice").await;

    let (hash,): (String,) = sqlx::query_as("SELECT secret_hash FROM users")
        .fetch_one(&state.db)
        .await
        .expect("user row");

    assert!(hash.starts_with("$argon2"));
    assert_ne!(hash, "hunter2hunter2");
}

#[tokio::test]
async fn registration_start_requires_an_enrolled_user() {
    let app = test_app().await;

    let (status, _) = post_json(
        &app,
        "/api/auth/register/start",
        json!({ "user_id": "no-such-user" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registration_start_issues_creation_options() {
    let app = test_app().await;
    let user_id = enroll(&app, "alice").await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register/start",
        json!({ "user_id": user_id }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let public_key = &body["publicKey"];
    assert!(!public_key["challenge"].as_str().expect("challenge").is_empty());
    assert_eq!(public_key["rp"]["id"], "localhost");
    assert_eq!(public_key["user"]["name"], "alice");
}

#[tokio::test]
async fn restarting_registration_replaces_the_challenge() {
    let app = test_app().await;
    let user_id = enroll(&app, "alice").await;

    let (_, first) = post_json(
        &app,
        "/api/auth/register/start",
        json!({ "user_id": user_id }),
    )
    .await;
    let (_, second) = post_json(
        &app,
        "/api/auth/register/start",
        json!({ "user_id": user_id }),
    )
    .await;

    assert_ne!(
        first["publicKey"]["challenge"],
        second["publicKey"]["challenge"]
    );
}

#[tokio::test]
async fn registration_finish_without_a_challenge_is_not_verified() {
    let app = test_app().await;
    let user_id = enroll(&app, "alice").await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register/finish",
        json!({ "user_id": user_id, "credential": { "bogus": true } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], false);
}

#[tokio::test]
async fn registration_finish_consumes_the_challenge_even_on_failure() {
    let app = test_app().await;
    let user_id = enroll(&app, "alice").await;

    post_json(
        &app,
        "/api/auth/register/start",
        json!({ "user_id": user_id }),
    )
    .await;

    // A malformed attestation fails verification...
    let (status, body) = post_json(
        &app,
        "/api/auth/register/finish",
        json!({ "user_id": user_id, "credential": { "bogus": true } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], false);

    // ...and the retry gets the same opaque outcome: the slot is spent.
    let (status, body) = post_json(
        &app,
        "/api/auth/register/finish",
        json!({ "user_id": user_id, "credential": { "bogus": true } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], false);
}

#[tokio::test]
async fn registration_finish_requires_an_enrolled_user() {
    let app = test_app().await;

    let (status, _) = post_json(
        &app,
        "/api/auth/register/finish",
        json!({ "user_id": "no-such-user", "credential": {} }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn authentication_start_distinguishes_unknown_user_from_unbound_user() {
    let app = test_app().await;
    let user_id = enroll(&app, "alice").await;

    // Unknown user: not found.
    let (status, _) = post_json(
        &app,
        "/api/auth/authenticate/start",
        json!({ "user_id": "no-such-user" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Enrolled but never registered a passkey: a different condition.
    let (status, body) = post_json(
        &app,
        "/api/auth/authenticate/start",
        json!({ "user_id": user_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("No credential"));
}

#[tokio::test]
async fn authentication_finish_requires_a_bound_credential() {
    let app = test_app().await;
    let user_id = enroll(&app, "alice").await;

    let (status, _) = post_json(
        &app,
        "/api/auth/authenticate/finish",
        json!({ "user_id": user_id, "credential": { "bogus": true } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ceremonies_for_different_users_are_independent() {
    let state = test_state().await;
    let app = create_router(state.clone());
    let alice = enroll(&app, "alice").await;
    let bob = enroll(&app, "bob").await;

    post_json(&app, "/api/auth/register/start", json!({ "user_id": alice })).await;

    // Bob never started a ceremony; Alice's challenge is not his to spend.
    let (status, body) = post_json(
        &app,
        "/api/auth/register/finish",
        json!({ "user_id": bob, "credential": { "bogus": true } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], false);

    // Alice's slot survived Bob's attempt.
    let (slots,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM ceremony_challenges WHERE user_id = ?")
            .bind(&alice)
            .fetch_one(&state.db)
            .await
            .expect("challenge count");
    assert_eq!(slots, 1);
}

#[tokio::test]
async fn expired_challenges_do_not_verify() {
    let mut state = test_state().await;
    state.challenge_ttl_secs = 0;
    let app = create_router(state);
    let user_id = enroll(&app, "alice").await;

    post_json(
        &app,
        "/api/auth/register/start",
        json!({ "user_id": user_id }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register/finish",
        json!({ "user_id": user_id, "credential": { "bogus": true } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], false);
}
