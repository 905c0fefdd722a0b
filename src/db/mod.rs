//! # Database Module
//!
//! Storage for the server, split by concern:
//! - `models`: row types (`User`, `BoundCredential`, `CeremonyChallenge`)
//! - `users`: enrolled users
//! - `credentials`: the passkey binding per user
//! - `challenges`: single-use ceremony challenge slots

pub mod challenges;
pub mod credentials;
pub mod models;
pub mod users;

/// In-memory SQLite pool with the schema applied, for store tests.
///
/// A single connection keeps the `:memory:` database alive and visible to
/// every query in the test.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}
