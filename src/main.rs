use anyhow::Context;
use tracing_subscriber::EnvFilter;

use myflix_api::{app, config, database::DatabaseManager, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("myflix_api=info,tower_http=info")),
        )
        .init();

    let config = config::config().clone();
    tracing::info!("Starting myFlix API in {:?} mode", config.environment);

    config.ensure_jwt_secret().map_err(anyhow::Error::msg)?;

    let store = DatabaseManager::open_store(&config)
        .await
        .context("failed to open store")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(store, config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
