//! Application state management

use crate::config::ProxyConfig;
use crate::error::Result;
use crate::fallback::FallbackRegistry;
use parking_lot::RwLock;

/// Application state shared across all request handlers
pub struct AppState {
    /// Proxy configuration, fixed after startup
    pub config: ProxyConfig,

    /// Shared HTTP client for forwarding and probing
    pub client: reqwest::Client,

    /// Fallback generators, consulted when forwarding fails
    pub fallbacks: FallbackRegistry,

    /// Last observed upstream availability; `None` until first probe
    upstream_reachable: RwLock<Option<bool>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.forward_timeout)
            .build()?;

        Ok(Self {
            config,
            client,
            fallbacks: FallbackRegistry::new(),
            upstream_reachable: RwLock::new(None),
        })
    }

    /// Last observed upstream availability
    pub fn upstream_reachable(&self) -> Option<bool> {
        *self.upstream_reachable.read()
    }

    /// Record an upstream observation, returning the previous one so
    /// callers can log transitions.
    pub fn set_upstream_reachable(&self, reachable: bool) -> Option<bool> {
        self.upstream_reachable.write().replace(reachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_transitions() {
        let state = AppState::new(ProxyConfig::default()).unwrap();
        assert_eq!(state.upstream_reachable(), None);

        assert_eq!(state.set_upstream_reachable(false), None);
        assert_eq!(state.upstream_reachable(), Some(false));

        assert_eq!(state.set_upstream_reachable(true), Some(false));
        assert_eq!(state.upstream_reachable(), Some(true));
    }
}
