//! MarketDash dev proxy binary

use marketdash_proxy::config::ProxyConfig;
use marketdash_proxy::health;
use marketdash_proxy::proxy::ProxyServer;
use marketdash_proxy::scheduler::UpstreamMonitor;
use marketdash_proxy::state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketdash_proxy=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MarketDash dev proxy...");

    let config = ProxyConfig::from_env()?;
    let state = Arc::new(AppState::new(config)?);

    // Advisory only: logs guidance if the backend is down, never blocks
    health::check_backend(&state).await;

    let mut monitor = UpstreamMonitor::new(Arc::clone(&state)).start();

    let mut server = ProxyServer::new(Arc::clone(&state));
    server.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping...");

    monitor.stop();
    server.stop();

    Ok(())
}
