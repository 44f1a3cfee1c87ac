//! MarketDash Dev Proxy
//!
//! A development proxy for the MarketDash trading dashboard. Dashboard
//! API calls are forwarded to a locally running backend; when the backend
//! is unreachable the proxy answers with generated signal and market-data
//! payloads so the UI stays usable during frontend work.

pub mod config;
pub mod error;
pub mod fallback;
pub mod health;
pub mod proxy;
pub mod scheduler;
pub mod state;
