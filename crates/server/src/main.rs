use std::net::SocketAddr;

use anyhow::{Context, Result};
use glossa_server::{AppState, ServerConfig, build_app};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,glossa_server=debug,glossa_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        model = %config.lookup.model,
        parse_limit = config.rate_limits.parse.max_requests,
        lookup_limit = config.rate_limits.lookup.max_requests,
        "configuration loaded"
    );

    let state = AppState::from_config(&config)?;
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("Listening on http://{}", config.bind_addr);
    tracing::info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
