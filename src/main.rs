use anyhow::Context;
use std::net::SocketAddr;

use codebreaker::{config::Config, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    // Set ENVIRONMENT=development for debug logs, or RUST_LOG to override
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .init();

    tracing::info!("🔢 Codebreaker game server starting...");
    tracing::info!(
        "Scoring mode: {:?}, automated opponent: {:?} ({} attempts)",
        config.evaluation_mode,
        config.guesser_strategy,
        config.guesser_max_attempts
    );

    let addr = config.bind_address();
    let state = AppState::new(config);

    // Expired games are swept in the background for the server's lifetime
    let sweeper = state.engine.spawn_sweeper();
    tracing::info!("🧹 Game sweeper started");

    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("✅ Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    sweeper.abort();
    tracing::info!("👋 Shutting down game server...");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
