//! Proxy forwarding module
//!
//! Intercepts dashboard API calls under the forwarded prefixes, relays
//! them to the configured backend origin, and substitutes fallback data
//! when the backend cannot be reached. The backend's own responses,
//! including its error statuses, pass through untouched; only transport
//! failures are masked.

mod server;
pub mod handlers;
pub mod types;

pub use server::{build_router, ProxyServer};
pub use types::Envelope;
