//! Server entry point: logging, configuration, state, and the listener.

use passkey_rp::config::Config;
use passkey_rp::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging, filterable via RUST_LOG.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,passkey_rp=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    let app_state = AppState::new(&config).await?;
    tracing::info!("Application state initialized");

    // Sweep expired challenge slots so abandoned ceremonies do not
    // accumulate in the ledger.
    let cleanup_pool = app_state.db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            match passkey_rp::db::challenges::cleanup_expired(&cleanup_pool).await {
                Ok(removed) if removed > 0 => {
                    tracing::debug!(removed, "expired challenges swept");
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Challenge cleanup failed: {:?}", e),
            }
        }
    });

    let app = passkey_rp::create_router(app_state);

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
