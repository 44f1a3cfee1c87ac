//! Startup backend health check
//!
//! One advisory probe against the backend's test endpoint. A failure is
//! logged with manual startup guidance for the operator and the proxy
//! carries on serving; request handling never waits on this.

use crate::config::HEALTH_PATH;
use crate::state::AppState;
use tracing::{info, warn};

/// Probe the backend once and log the outcome. Never fails.
pub async fn check_backend(state: &AppState) {
    let origin = state.config.backend_origin();
    let url = format!("{}{}", origin, HEALTH_PATH);

    let result = state
        .client
        .get(url)
        .timeout(state.config.health_timeout)
        .send()
        .await;

    match result {
        Ok(response) => {
            state.set_upstream_reachable(true);
            info!("Backend reachable at {} ({})", origin, response.status());
        }
        Err(e) => {
            state.set_upstream_reachable(false);
            warn!("Backend at {} is not reachable: {}", origin, e);
            warn!("The proxy will serve generated fallback data until the backend comes up.");
            warn!("To start the backend manually:");
            warn!("  1. cd backend");
            warn!("  2. source venv/bin/activate  (.\\venv\\Scripts\\activate on Windows)");
            warn!(
                "  3. python main.py  (must listen on port {})",
                state.config.backend_port
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use std::time::Duration;

    // A port with nothing listening on it
    async fn dead_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_advisory() {
        let config = ProxyConfig {
            backend_port: dead_port().await,
            health_timeout: Duration::from_millis(500),
            ..ProxyConfig::default()
        };
        let state = AppState::new(config).unwrap();

        // Must return rather than fail or block
        check_backend(&state).await;
        assert_eq!(state.upstream_reachable(), Some(false));
    }

    #[tokio::test]
    async fn test_reachable_backend_is_recorded() {
        use axum::{routing::get, Router};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let app = Router::new().route("/api/test", get(|| async { "ok" }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ProxyConfig {
            backend_port: port,
            ..ProxyConfig::default()
        };
        let state = AppState::new(config).unwrap();

        check_backend(&state).await;
        assert_eq!(state.upstream_reachable(), Some(true));
    }
}
