//! Fallback AI-signal synthesis
//!
//! Signal routes are answered with one canned bullish setup so the alerts
//! view keeps rendering while the backend is down. The indicator readings
//! are fixed; only the symbol and timestamp vary per request.

use crate::fallback::{trailing_symbol, FallbackData, FallbackGenerator};
use crate::proxy::types::Envelope;
use chrono::Utc;
use serde::Serialize;

/// Path marker that selects this generator
pub const SIGNALS_MARKER: &str = "ai_signals";

/// Signal payload returned for an ai-signals route
#[derive(Debug, Clone, Serialize)]
pub struct SignalPayload {
    pub symbol: String,
    pub timestamp: String,
    pub signals: Vec<Signal>,
    pub ai_analysis: String,
    pub risk_level: RiskLevel,
    pub opportunity_score: f64,
}

/// One detected setup with its supporting indicator readings
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: String,
    pub timeframe: String,
    /// Model confidence in [0, 1]
    pub confidence: f64,
    pub description: String,
    pub indicators: Vec<IndicatorReading>,
}

/// An indicator value against its trigger threshold
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorReading {
    pub name: String,
    pub value: f64,
    pub threshold: f64,
    pub signal: String,
}

/// Risk bucket attached to a signal payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Build the canned payload for a symbol
pub fn signal_payload(symbol: &str) -> SignalPayload {
    SignalPayload {
        symbol: symbol.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        signals: vec![Signal {
            signal_type: "bullish".to_string(),
            timeframe: "1d".to_string(),
            confidence: 0.72,
            description: "RSI oversold with MACD approaching a bullish crossover".to_string(),
            indicators: vec![
                IndicatorReading {
                    name: "RSI".to_string(),
                    value: 32.0,
                    threshold: 30.0,
                    signal: "oversold".to_string(),
                },
                IndicatorReading {
                    name: "MACD".to_string(),
                    value: -0.5,
                    threshold: 0.0,
                    signal: "approaching_crossover".to_string(),
                },
            ],
        }],
        ai_analysis: format!(
            "{} is showing early reversal behaviour. Momentum is still negative but \
             improving, which favours a cautious long entry with tight risk control.",
            symbol
        ),
        risk_level: RiskLevel::Medium,
        opportunity_score: 7.5,
    }
}

/// Generator for ai-signals routes
pub struct SignalsGenerator;

impl FallbackGenerator for SignalsGenerator {
    fn name(&self) -> &'static str {
        "signals"
    }

    fn matches(&self, path: &str) -> bool {
        path.contains(SIGNALS_MARKER)
    }

    fn generate(&self, path: &str) -> Envelope {
        let symbol = trailing_symbol(path, SIGNALS_MARKER);
        Envelope::fallback_with_data(
            "Backend unavailable, using generated signal data",
            FallbackData::Signals(signal_payload(&symbol)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_payload_shape() {
        let payload = signal_payload("TSLA");

        assert_eq!(payload.symbol, "TSLA");
        assert_eq!(payload.signals.len(), 1);
        assert_eq!(payload.risk_level, RiskLevel::Medium);
        assert_eq!(payload.opportunity_score, 7.5);

        let signal = &payload.signals[0];
        assert_eq!(signal.signal_type, "bullish");
        assert!(signal.confidence > 0.0 && signal.confidence <= 1.0);
        assert_eq!(signal.indicators.len(), 2);

        let rsi = &signal.indicators[0];
        assert_eq!((rsi.name.as_str(), rsi.value, rsi.threshold), ("RSI", 32.0, 30.0));
        let macd = &signal.indicators[1];
        assert_eq!((macd.name.as_str(), macd.value, macd.threshold), ("MACD", -0.5, 0.0));
    }

    #[test]
    fn test_serialized_field_names() {
        let payload = signal_payload("AAPL");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["risk_level"], "medium");
        assert_eq!(json["signals"][0]["type"], "bullish");
        assert_eq!(json["signals"][0]["indicators"][0]["name"], "RSI");
    }

    #[test]
    fn test_empty_symbol_degrades() {
        let payload = signal_payload("");
        assert_eq!(payload.symbol, "");
        assert_eq!(payload.signals.len(), 1);
    }
}
