//! canti-server entry point.

use anyhow::Result;
use canti_core::CantiConfig;
use canti_server::logging::init_logging;
use canti_server::routes::RELAY_PATH;
use canti_server::{app_with_state, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = CantiConfig::from_env()?;
    init_logging(&config.logging);

    tracing::info!("Canti relay v{}", env!("CARGO_PKG_VERSION"));
    if config.upstream.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; completion calls will fail upstream");
    }
    tracing::debug!(upstream = ?config.upstream, "upstream configured");

    let state = AppState::from_config(&config)?;
    let app = app_with_state(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(model = %config.upstream.model, "Serving {} on {}", RELAY_PATH, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
