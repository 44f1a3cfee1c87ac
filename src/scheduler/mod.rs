//! Scheduler module for the MarketDash dev proxy
//!
//! Handles periodic background tasks:
//! - Upstream availability monitoring

mod upstream_monitor;

pub use upstream_monitor::{MonitorHandle, UpstreamMonitor};
