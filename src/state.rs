//! # Application State
//!
//! Shared state handed to every request handler: the SQLite pool, the
//! configured WebAuthn verifier, and the challenge TTL policy. Axum
//! clones the state per request, which is cheap — the pool is already a
//! handle and the verifier sits behind an `Arc`.

use crate::config::Config;
use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use webauthn_rs::prelude::*;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: SqlitePool,

    /// WebAuthn verifier, configured with the relying-party identity and
    /// expected origin. Generates ceremony options and performs the
    /// attestation/assertion checks.
    pub webauthn: Arc<Webauthn>,

    /// How long issued challenges stay consumable, in seconds.
    pub challenge_ttl_secs: u64,
}

impl AppState {
    /// Connect to the database, apply migrations, and build the WebAuthn
    /// verifier from the configured relying-party identity.
    ///
    /// # Errors
    /// Fails if the database is unreachable, migrations fail, or the
    /// relying-party origin is not a valid URL.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = SqlitePool::connect(&config.database_url).await?;

        // Embedded migrations from ./migrations, applied idempotently.
        sqlx::migrate!("./migrations").run(&db).await?;

        // The verifier checks every ceremony response against exactly
        // this RP id and origin.
        let rp_origin = Url::parse(&config.rp_origin)?;
        let builder = WebauthnBuilder::new(&config.rp_id, &rp_origin)?
            .rp_name(&config.rp_name);
        let webauthn = Arc::new(builder.build()?);

        Ok(AppState {
            db,
            webauthn,
            challenge_ttl_secs: config.challenge_ttl_secs,
        })
    }
}
