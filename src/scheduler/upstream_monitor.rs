//! Periodic upstream availability monitor
//!
//! Re-probes the backend's test endpoint on a fixed interval and records
//! the result in shared state, logging up/down transitions. The task is
//! owned by a [`MonitorHandle`]; stopping or dropping the handle cancels
//! it. A tick runs one probe to completion, so probes never overlap.

use crate::config::HEALTH_PATH;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Upstream monitor that probes the backend on `monitor_interval`
pub struct UpstreamMonitor {
    state: Arc<AppState>,
}

/// Handle owning the monitor task; cancels it on stop or drop
pub struct MonitorHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl UpstreamMonitor {
    /// Create a new monitor
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Start the monitor, returning the handle that owns the task
    pub fn start(self) -> MonitorHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let interval = self.state.config.monitor_interval;

        info!(
            "Upstream monitor started, probing every {}s",
            interval.as_secs()
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        info!("Upstream monitor stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.probe().await;
                    }
                }
            }
        });

        MonitorHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    /// Probe the backend once and record the observation
    async fn probe(&self) {
        let origin = self.state.config.backend_origin();
        let url = format!("{}{}", origin, HEALTH_PATH);

        let result = self
            .state
            .client
            .get(url)
            .timeout(self.state.config.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) => {
                let previous = self.state.set_upstream_reachable(true);
                if previous != Some(true) {
                    info!("Backend at {} is reachable ({})", origin, response.status());
                }
            }
            Err(e) => {
                let previous = self.state.set_upstream_reachable(false);
                if previous != Some(false) {
                    warn!("Backend at {} became unreachable: {}", origin, e);
                } else {
                    debug!("Backend at {} still unreachable: {}", origin, e);
                }
            }
        }
    }
}

impl MonitorHandle {
    /// Stop the monitor task
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Check if the monitor is still running
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
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
    async fn test_monitor_records_unreachable_backend() {
        let config = ProxyConfig {
            backend_port: dead_port().await,
            monitor_interval: Duration::from_millis(10),
            health_timeout: Duration::from_millis(200),
            ..ProxyConfig::default()
        };
        let state = Arc::new(AppState::new(config).unwrap());

        let mut handle = UpstreamMonitor::new(Arc::clone(&state)).start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(state.upstream_reachable(), Some(false));

        handle.stop();
    }

    #[tokio::test]
    async fn test_stop_cancels_the_task() {
        let config = ProxyConfig {
            backend_port: dead_port().await,
            monitor_interval: Duration::from_millis(10),
            health_timeout: Duration::from_millis(200),
            ..ProxyConfig::default()
        };
        let state = Arc::new(AppState::new(config).unwrap());

        let mut handle = UpstreamMonitor::new(state).start();
        assert!(handle.is_running());

        handle.stop();
        assert!(!handle.is_running());

        // The task must actually finish once the handle is stopped
        tokio::time::timeout(Duration::from_secs(1), &mut handle.task)
            .await
            .expect("monitor task did not stop")
            .unwrap();
    }
}
