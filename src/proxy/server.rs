//! HTTP server for the dev proxy
//!
//! Provides:
//! - Forwarding routes under /api/* and /market/*
//! - A local liveness endpoint (/health)
//! - CORS and request tracing for local development

use crate::error::{AppError, Result};
use crate::proxy::handlers;
use crate::state::AppState;
use axum::{
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Proxy server manager
pub struct ProxyServer {
    state: Arc<AppState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

/// Build the proxy router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS is wide open: this server only ever fronts a local dev UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Liveness of the proxy itself, answered locally
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::health_check))
        // Everything under the forwarded prefixes goes upstream
        .route("/api/*path", any(handlers::forward_request))
        .route("/market/*path", any(handlers::forward_request))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

impl ProxyServer {
    /// Create a new server
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            shutdown_tx: None,
        }
    }

    /// Start the server
    pub async fn start(&mut self) -> Result<()> {
        let addr: SocketAddr = self
            .state
            .config
            .listen_addr()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid listen address: {}", e)))?;

        let app = build_router(Arc::clone(&self.state));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        info!("Starting MarketDash dev proxy on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Dev proxy shutting down");
            });

            if let Err(e) = server.await {
                error!("Dev proxy server error: {}", e);
            }
        });

        let origin = self.state.config.backend_origin();
        info!("MarketDash dev proxy started successfully");
        info!("");
        info!("=== Endpoints ===");
        info!("  GET  http://{}/health", local_addr);
        info!("  ANY  http://{}/api/*     -> {}/api/*", local_addr, origin);
        info!("  ANY  http://{}/market/*  -> {}/market/*", local_addr, origin);

        Ok(())
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("Dev proxy stop signal sent");
        }
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for ProxyServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;

    #[tokio::test]
    async fn test_start_and_stop() {
        let config = ProxyConfig {
            listen_port: 0,
            ..ProxyConfig::default()
        };
        let state = Arc::new(AppState::new(config).unwrap());

        let mut server = ProxyServer::new(state);
        assert!(!server.is_running());

        server.start().await.unwrap();
        assert!(server.is_running());

        server.stop();
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_proxy_liveness_endpoint() {
        let config = ProxyConfig {
            listen_port: 0,
            ..ProxyConfig::default()
        };
        let state = Arc::new(AppState::new(config).unwrap());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let response = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json["success"], true);
    }
}
