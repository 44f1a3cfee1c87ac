//! Proxy response types

use crate::fallback::FallbackData;
use serde::Serialize;

/// JSON envelope for responses the proxy answers itself.
///
/// Relayed backend responses never pass through this type; they are
/// returned verbatim. Synthetic envelopes always report `success: true`
/// and carry `fallback: true` so callers can tell generated data from
/// real data without the status code changing.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FallbackData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

impl Envelope {
    pub fn success_with_message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
            fallback: None,
        }
    }

    pub fn fallback_with_message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
            fallback: Some(true),
        }
    }

    pub fn fallback_with_data(message: &str, data: FallbackData) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
            fallback: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_omits_absent_fields() {
        let envelope = Envelope::success_with_message("MarketDash dev proxy is running");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "MarketDash dev proxy is running");
        assert!(json.get("data").is_none());
        assert!(json.get("fallback").is_none());
    }

    #[test]
    fn test_fallback_envelope_is_marked() {
        let envelope = Envelope::fallback_with_message("Backend unavailable");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["fallback"], true);
    }
}
