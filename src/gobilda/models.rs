//! Data model for the aggregator request envelope and quote results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request envelope handed over by the parts-sourcing aggregator. Field
/// names follow its wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    /// Vendor tag the request is aimed at
    #[serde(default)]
    pub vendor: Option<String>,
    /// SKU for availability checks
    #[serde(default)]
    pub sku: Option<String>,
    /// Aggregator client version, injected into the User-Agent
    pub partcad_version: String,
    /// Cart of line items, present for quote/order operations
    #[serde(default)]
    pub cart: Option<PartsCart>,
}

/// A cart of line items keyed by an aggregator-chosen name, plus an opaque
/// QoS tag echoed back in the quote.
#[derive(Debug, Clone, Deserialize)]
pub struct PartsCart {
    pub parts: BTreeMap<String, PartSpec>,
    #[serde(default)]
    pub qos: Value,
}

/// One requested line item.
#[derive(Debug, Clone, Deserialize)]
pub struct PartSpec {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Requested number of physical units
    pub count: u32,
    /// Package size: units contained in one purchasable SKU unit
    pub count_per_sku: u32,
}

impl PartSpec {
    /// Number of packages to order to cover `count` units, rounding up.
    /// `None` when the package size is zero (invalid input, not a panic).
    pub fn packages(&self) -> Option<u32> {
        if self.count_per_sku == 0 {
            return None;
        }
        Some(self.count.div_ceil(self.count_per_sku))
    }
}

/// Raw storefront response, surfaced with enough context for parse
/// diagnostics (status, headers, body) and session-cookie extraction.
#[derive(Debug, Clone)]
pub struct StoreResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub cookies: Vec<(String, String)>,
}

impl StoreResponse {
    /// Looks up a response cookie by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Headers flattened to one line for diagnostic logging.
    pub fn headers_line(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Shopping session established by the cart page. Lives for one quote call.
/// A missing token is a degraded-but-usable outcome; continuity rides on
/// the HTTP client's cookie jar either way.
#[derive(Debug, Clone, Default)]
pub struct CartSession {
    pub token: Option<String>,
    pub empty: bool,
}

/// Result of one successful cart addition.
#[derive(Debug, Clone)]
pub struct CartAddition {
    pub price: f64,
    pub cart_id: String,
}

/// Availability verdict for an availability check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
}

/// Aggregate quote for a cart, with the fixed fulfillment window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// QoS tag passed through from the request unchanged
    pub qos: Value,
    /// Sum of the reported prices across added line items
    pub price: f64,
    /// Unix timestamp after which the quote is stale
    pub expire: i64,
    /// Identifier of the last cart touched
    #[serde(rename = "cartId")]
    pub cart_id: String,
    /// Earliest fulfillment, unix timestamp
    #[serde(rename = "etaMin")]
    pub eta_min: i64,
    /// Latest fulfillment, unix timestamp
    #[serde(rename = "etaMax")]
    pub eta_max: i64,
}

/// Placeholder fulfillment window: ready in one hour, delivered within two.
const ETA_MIN_SECS: i64 = 3600;
const ETA_MAX_SECS: i64 = 7200;

impl Quote {
    /// Builds a quote around `now`, applying the fixed window policy.
    /// The quote expires when the window opens.
    pub fn with_window(qos: Value, price: f64, cart_id: String, now: chrono::DateTime<chrono::Utc>) -> Self {
        let base = now.timestamp();
        Self {
            qos,
            price,
            expire: base + ETA_MIN_SECS,
            cart_id,
            eta_min: base + ETA_MIN_SECS,
            eta_max: base + ETA_MAX_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_part(count: u32, count_per_sku: u32) -> PartSpec {
        PartSpec {
            vendor: Some("gobilda".to_string()),
            sku: Some("4103-0032-0043".to_string()),
            count,
            count_per_sku,
        }
    }

    #[test]
    fn test_packages_exact_multiple() {
        assert_eq!(make_part(6, 2).packages(), Some(3));
        assert_eq!(make_part(10, 10).packages(), Some(1));
    }

    #[test]
    fn test_packages_rounds_up() {
        assert_eq!(make_part(5, 2).packages(), Some(3));
        assert_eq!(make_part(1, 4).packages(), Some(1));
        assert_eq!(make_part(7, 3).packages(), Some(3));
    }

    #[test]
    fn test_packages_zero_package_size() {
        assert_eq!(make_part(5, 0).packages(), None);
    }

    #[test]
    fn test_quote_window_policy() {
        let now = Utc::now();
        let quote = Quote::with_window(Value::Null, 12.5, "cart-1".to_string(), now);

        assert!(quote.eta_min <= quote.eta_max);
        assert_eq!(quote.expire, quote.eta_min);
        assert_eq!(quote.eta_max - quote.eta_min, 3600);
        assert_eq!(quote.eta_min - now.timestamp(), 3600);
    }

    #[test]
    fn test_quote_wire_names() {
        let quote =
            Quote::with_window(Value::String("fast".to_string()), 1.0, "c".to_string(), Utc::now());
        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains("\"cartId\""));
        assert!(json.contains("\"etaMin\""));
        assert!(json.contains("\"etaMax\""));
        assert!(json.contains("\"qos\":\"fast\""));
    }

    #[test]
    fn test_request_envelope_deserializes() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "partcad_version": "0.7.1",
                "cart": {
                    "qos": "normal",
                    "parts": {
                        "p1": {"vendor": "gobilda", "sku": "4103-0032-0043", "count": 5, "count_per_sku": 2}
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(request.partcad_version, "0.7.1");
        let cart = request.cart.unwrap();
        assert_eq!(cart.qos, Value::String("normal".to_string()));
        let part = &cart.parts["p1"];
        assert_eq!(part.sku.as_deref(), Some("4103-0032-0043"));
        assert_eq!(part.packages(), Some(3));
    }

    #[test]
    fn test_request_envelope_availability_shape() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{"vendor": "gobilda", "sku": "1600-0722-0014", "partcad_version": "0.7.1"}"#,
        )
        .unwrap();
        assert_eq!(request.vendor.as_deref(), Some("gobilda"));
        assert!(request.cart.is_none());
    }

    #[test]
    fn test_store_response_cookie_lookup() {
        let response = StoreResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: String::new(),
            cookies: vec![("SHOP_SESSION_TOKEN".to_string(), "abc123".to_string())],
        };
        assert_eq!(response.cookie("SHOP_SESSION_TOKEN"), Some("abc123"));
        assert_eq!(response.cookie("XSRF-TOKEN"), None);
        assert!(response.headers_line().contains("content-type: text/html"));
    }
}
