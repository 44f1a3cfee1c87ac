//! Proxy configuration
//!
//! All settings come from environment variables with fixed defaults so the
//! proxy runs out of the box against a locally started backend. Values are
//! read once at startup and never change afterwards.

use crate::error::{AppError, Result};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Backend endpoint probed by the startup health check and the monitor.
pub const HEALTH_PATH: &str = "/api/test";

const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";
const DEFAULT_LISTEN_PORT: u16 = 3001;
const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";
const DEFAULT_BACKEND_PORT: u16 = 8000;
const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 30;

/// Proxy configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Address the proxy listens on
    pub listen_host: String,
    pub listen_port: u16,

    /// Backend the proxy forwards to
    pub backend_host: String,
    pub backend_port: u16,

    /// Upper bound on a forwarded request before it counts as a failure
    pub forward_timeout: Duration,

    /// Timeout for the startup health probe
    pub health_timeout: Duration,

    /// Interval between background upstream probes
    pub monitor_interval: Duration,
}

impl ProxyConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// A present-but-malformed numeric variable is a startup error rather
    /// than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            listen_host: env_string("PROXY_LISTEN_HOST", DEFAULT_LISTEN_HOST),
            listen_port: env_parse("PROXY_LISTEN_PORT", DEFAULT_LISTEN_PORT)?,
            backend_host: env_string("PROXY_BACKEND_HOST", DEFAULT_BACKEND_HOST),
            backend_port: env_parse("PROXY_BACKEND_PORT", DEFAULT_BACKEND_PORT)?,
            forward_timeout: Duration::from_secs(env_parse(
                "PROXY_FORWARD_TIMEOUT",
                DEFAULT_FORWARD_TIMEOUT_SECS,
            )?),
            health_timeout: Duration::from_secs(env_parse(
                "PROXY_HEALTH_TIMEOUT",
                DEFAULT_HEALTH_TIMEOUT_SECS,
            )?),
            monitor_interval: Duration::from_secs(env_parse(
                "PROXY_MONITOR_INTERVAL",
                DEFAULT_MONITOR_INTERVAL_SECS,
            )?),
        };

        Url::parse(&config.backend_origin())
            .map_err(|e| AppError::Config(format!("Invalid backend origin: {}", e)))?;

        Ok(config)
    }

    /// Address to bind the listener to, e.g. `127.0.0.1:3001`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }

    /// Origin forwarded requests are rewritten to, e.g. `http://127.0.0.1:8000`
    pub fn backend_origin(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_host: DEFAULT_LISTEN_HOST.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            backend_host: DEFAULT_BACKEND_HOST.to_string(),
            backend_port: DEFAULT_BACKEND_PORT,
            forward_timeout: Duration::from_secs(DEFAULT_FORWARD_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            monitor_interval: Duration::from_secs(DEFAULT_MONITOR_INTERVAL_SECS),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value
            .parse()
            .map_err(|e| AppError::Config(format!("{} is not a valid number: {}", key, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutations live in a single test to keep them off the
    // parallel test runner's shared process environment.
    #[test]
    fn test_from_env() {
        // Defaults with nothing set
        std::env::remove_var("PROXY_BACKEND_PORT");
        std::env::remove_var("PROXY_FORWARD_TIMEOUT");
        let config = ProxyConfig::from_env().unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:3001");
        assert_eq!(config.backend_origin(), "http://127.0.0.1:8000");
        assert_eq!(config.forward_timeout, Duration::from_secs(10));

        // Overrides
        std::env::set_var("PROXY_BACKEND_PORT", "9000");
        std::env::set_var("PROXY_FORWARD_TIMEOUT", "3");
        let config = ProxyConfig::from_env().unwrap();
        assert_eq!(config.backend_origin(), "http://127.0.0.1:9000");
        assert_eq!(config.forward_timeout, Duration::from_secs(3));

        // Malformed numeric value is an error, not a fallback
        std::env::set_var("PROXY_BACKEND_PORT", "not-a-port");
        assert!(ProxyConfig::from_env().is_err());

        std::env::remove_var("PROXY_BACKEND_PORT");
        std::env::remove_var("PROXY_FORWARD_TIMEOUT");
    }

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listen_port, 3001);
        assert_eq!(config.backend_port, 8000);
        assert_eq!(config.monitor_interval, Duration::from_secs(30));
    }
}
