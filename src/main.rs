//! Application entrypoint and state wiring.

use std::sync::Arc;

use checkout_ledger::clock::SystemClock;
use checkout_ledger::config::ServerConfig;
use checkout_ledger::{routes, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 1) config
    let config = ServerConfig::from_env().map_err(|e| {
        tracing::error!("configuration error: {e}");
        e
    })?;

    // 2) chain with genesis
    let state = AppState::new(Arc::new(SystemClock));

    // 3) dump the chain in the background
    let ledger = Arc::clone(&state.ledger);
    tokio::spawn(async move { ledger.print_chain() });

    // 4) serve
    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| {
            tracing::error!("failed to bind {}: {e}", config.bind_addr);
            e
        })?;
    tracing::info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("server error: {e}");
        e
    })?;

    Ok(())
}
