//! Fallback OHLCV bar synthesis
//!
//! When the backend is down, market-data routes are answered with a
//! 30-day daily bar series generated by a random walk from a fixed base
//! price. The series only has to look plausible on a chart; it is never
//! persisted and a fresh one is built per request.

use crate::fallback::{trailing_symbol, FallbackData, FallbackGenerator};
use crate::proxy::types::Envelope;
use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;

/// Path marker that selects this generator
pub const MARKET_DATA_MARKER: &str = "market-data";

/// Calendar days of history in a generated series, ending today
pub const LOOKBACK_DAYS: usize = 30;

/// Base prices for tickers the dashboard ships with
const BASE_PRICES: &[(&str, f64)] = &[
    ("AAPL", 180.0),
    ("GOOGL", 140.0),
    ("MSFT", 380.0),
    ("AMZN", 175.0),
    ("TSLA", 250.0),
    ("META", 500.0),
    ("NVDA", 880.0),
    ("NFLX", 600.0),
];

/// Unknown tickers start here
const DEFAULT_BASE_PRICE: f64 = 100.0;

// Daily percent change range, biased slightly upward
const CHANGE_MIN_PCT: f64 = -2.0;
const CHANGE_MAX_PCT: f64 = 2.5;

// High/low wick padding, as a fraction of the day's body edge
const MAX_WICK_FRACTION: f64 = 0.01;

const VOLUME_MIN: i64 = 1_000_000;
const VOLUME_MAX: i64 = 10_000_000;

/// One synthesized daily OHLCV bar
#[derive(Debug, Clone, Serialize)]
pub struct MarketBar {
    pub date: NaiveDate,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    /// Percent change from open to close, 2 decimals
    pub change: f64,
}

/// Bar series returned for a market-data route
#[derive(Debug, Clone, Serialize)]
pub struct MarketDataSeries {
    pub symbol: String,
    pub timestamp: String,
    pub bars: Vec<MarketBar>,
}

/// Resolve a symbol's starting price from the fixed table
pub fn base_price(symbol: &str) -> f64 {
    BASE_PRICES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

/// Generate a daily bar series ending on `end_date`.
///
/// Each day opens at the previous close; high/low are padded outward from
/// the body by independent random offsets, so after rounding every bar
/// still satisfies `high >= max(open, close)` and `low <= min(open, close)`.
pub fn generate_bars(symbol: &str, end_date: NaiveDate, rng: &mut impl Rng) -> Vec<MarketBar> {
    let mut bars = Vec::with_capacity(LOOKBACK_DAYS);
    let mut prev_close = base_price(symbol);

    for offset in (0..LOOKBACK_DAYS).rev() {
        let date = end_date - Duration::days(offset as i64);

        let open = prev_close;
        let drift = rng.gen_range(CHANGE_MIN_PCT..CHANGE_MAX_PCT);
        let close = round2(open * (1.0 + drift / 100.0));

        let body_top = open.max(close);
        let body_bottom = open.min(close);
        let high = round2(body_top + rng.gen_range(0.0..body_top * MAX_WICK_FRACTION));
        let low = round2(body_bottom - rng.gen_range(0.0..body_bottom * MAX_WICK_FRACTION));

        bars.push(MarketBar {
            date,
            symbol: symbol.to_string(),
            open,
            high,
            low,
            close,
            volume: rng.gen_range(VOLUME_MIN..VOLUME_MAX),
            change: round2((close - open) / open * 100.0),
        });

        prev_close = close;
    }

    bars
}

/// Round a price to 2 decimals
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generator for market-data routes
pub struct MarketDataGenerator;

impl FallbackGenerator for MarketDataGenerator {
    fn name(&self) -> &'static str {
        "market-data"
    }

    fn matches(&self, path: &str) -> bool {
        path.contains(MARKET_DATA_MARKER)
    }

    fn generate(&self, path: &str) -> Envelope {
        let symbol = trailing_symbol(path, MARKET_DATA_MARKER);
        let today = chrono::Local::now().date_naive();
        let bars = generate_bars(&symbol, today, &mut rand::thread_rng());

        Envelope::fallback_with_data(
            "Backend unavailable, using generated market data",
            FallbackData::MarketData(MarketDataSeries {
                symbol,
                timestamp: Utc::now().to_rfc3339(),
                bars,
            }),
        )
    }
}
