//! Fallback data synthesis
//!
//! When forwarding to the backend fails, the failed request's path is
//! matched against a registry of generators and the first match produces a
//! substitute JSON envelope. The registry order is the routing priority:
//! signals before market data, and a plain success envelope with no data
//! when nothing matches. Every fallback response is HTTP 200 with
//! `success: true` so the dashboard degrades instead of erroring.

pub mod market_data;
pub mod signals;

pub use market_data::{MarketBar, MarketDataGenerator, MarketDataSeries};
pub use signals::{IndicatorReading, RiskLevel, Signal, SignalPayload, SignalsGenerator};

use crate::proxy::types::Envelope;
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Synthesized payload carried in a fallback envelope
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FallbackData {
    Signals(SignalPayload),
    MarketData(MarketDataSeries),
}

/// A route-specific fallback generator
///
/// Implementations are pure formatting: no IO, one envelope per call.
pub trait FallbackGenerator: Send + Sync {
    /// Generator name, for logs
    fn name(&self) -> &'static str;

    /// Whether this generator handles the given request path
    fn matches(&self, path: &str) -> bool;

    /// Build the substitute envelope for a failed request
    fn generate(&self, path: &str) -> Envelope;
}

/// Registry of fallback generators, evaluated in priority order
pub struct FallbackRegistry {
    generators: Vec<Box<dyn FallbackGenerator>>,
}

impl FallbackRegistry {
    /// Create the registry with all built-in generators.
    ///
    /// Order matters: the first matching generator wins.
    pub fn new() -> Self {
        Self {
            generators: vec![
                Box::new(SignalsGenerator),
                Box::new(MarketDataGenerator),
            ],
        }
    }

    /// Find the generator responsible for a path, if any
    pub fn resolve(&self, path: &str) -> Option<&dyn FallbackGenerator> {
        self.generators
            .iter()
            .find(|g| g.matches(path))
            .map(|g| g.as_ref())
    }

    /// Build the fallback envelope for a failed request path
    pub fn respond(&self, path: &str) -> Envelope {
        match self.resolve(path) {
            Some(generator) => {
                debug!("Fallback generator '{}' selected for {}", generator.name(), path);
                generator.generate(path)
            }
            None => Envelope::fallback_with_message("Backend unavailable"),
        }
    }
}

impl Default for FallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the symbol from the trailing path segment.
///
/// The query string is stripped and the segment percent-decoded. A path
/// that ends at the route marker itself has no symbol and degrades to an
/// empty string.
pub(crate) fn trailing_symbol(path: &str, marker: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");

    if segment == marker {
        return String::new();
    }

    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string())
}
