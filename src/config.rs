//! # Configuration Management
//!
//! Configuration comes from the environment (plus an optional `.env` file
//! for development).
//!
//! ## Environment Variables
//! - `HOST`: server bind address (default: 127.0.0.1)
//! - `PORT`: server port (default: 8080)
//! - `DATABASE_URL`: SQLite connection string
//! - `RP_ID`: WebAuthn Relying Party ID — the domain, e.g. "localhost"
//! - `RP_ORIGIN`: expected web origin, e.g. "http://localhost:8080"
//! - `RP_NAME`: human-readable relying-party name
//! - `CHALLENGE_TTL_SECS`: how long an issued challenge stays consumable

use anyhow::Result;
use std::env;

/// Application configuration.
///
/// `rp_id` and `rp_origin` are security-critical: the authenticator signs
/// over exactly these values, so they must match the deployment precisely
/// or every ceremony verification will fail.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to.
    pub host: String,

    /// Server port number.
    pub port: u16,

    /// SQLite database connection URL. `mode=rwc` creates the file if
    /// it does not exist yet.
    pub database_url: String,

    /// WebAuthn Relying Party ID. The domain the app is served from,
    /// without scheme or port.
    pub rp_id: String,

    /// Full origin the app is reachable at, including scheme and port.
    pub rp_origin: String,

    /// Relying-party name shown to users during passkey creation.
    pub rp_name: String,

    /// Challenge time-to-live in seconds. An issued challenge that is not
    /// completed within this window consumes as missing.
    pub challenge_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// development defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        // Load .env if present; silently skipped otherwise.
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:passkey-rp.db?mode=rwc".to_string()),

            rp_id: env::var("RP_ID").unwrap_or_else(|_| "localhost".to_string()),

            rp_origin: env::var("RP_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),

            rp_name: env::var("RP_NAME").unwrap_or_else(|_| "Passkey RP".to_string()),

            challenge_ttl_secs: env::var("CHALLENGE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()?,
        })
    }

    /// Socket address string for the TCP listener, e.g. "127.0.0.1:8080".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
