//! # Checkout Types
//!
//! Cart line items, the checkout session request sent to the provider, and
//! return URL construction.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder the provider replaces with the real session ID
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// A line item as submitted by the client (untrusted).
///
/// Fields of the wrong JSON type decode as `None` so the validator reports
/// them as invalid item data instead of failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub price_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Option<f64>,
}

impl CartLineRequest {
    pub fn new(price_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            price_id: Some(price_id.into()),
            quantity: Some(f64::from(quantity)),
        }
    }

    /// Decode one submitted item; anything that is not an object is an
    /// item with no fields.
    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A line item that passed stock and availability checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedLineItem {
    /// Price ID
    pub price: String,
    /// Quantity
    pub quantity: u32,
}

/// Checkout UI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiMode {
    /// Checkout form embedded in the storefront page
    Embedded,
}

impl UiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiMode::Embedded => "embedded",
        }
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    Payment,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
        }
    }
}

/// Parameters for a provider checkout session
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionRequest {
    pub ui_mode: UiMode,
    pub mode: CheckoutMode,
    /// Where the provider sends the customer afterwards
    pub return_url: String,
    pub automatic_tax: bool,
    /// ISO country codes shipping may be collected for
    pub shipping_countries: Vec<String>,
    pub allow_promotion_codes: bool,
    pub line_items: Vec<ValidatedLineItem>,
}

impl CheckoutSessionRequest {
    /// Embedded one-time payment with automatic tax and promotion codes,
    /// shipping restricted to a single country.
    pub fn embedded_payment(
        return_url: impl Into<String>,
        shipping_country: impl Into<String>,
        line_items: Vec<ValidatedLineItem>,
    ) -> Self {
        Self {
            ui_mode: UiMode::Embedded,
            mode: CheckoutMode::Payment,
            return_url: return_url.into(),
            automatic_tax: true,
            shipping_countries: vec![shipping_country.into()],
            allow_promotion_codes: true,
            line_items,
        }
    }
}

/// A created checkout session
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session ID
    pub id: String,
    /// Secret the storefront uses to mount the embedded checkout
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// URLs the provider redirects to after checkout
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Storefront base URL, without trailing slash
    pub base_url: String,
    /// Return page path
    pub return_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            return_path: "/return".to_string(),
        }
    }

    /// Return URL carrying the session ID placeholder
    pub fn return_url(&self) -> String {
        format!(
            "{}{}?session_id={}",
            self.base_url, self.return_path, SESSION_ID_PLACEHOLDER
        )
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:4321")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_url_strips_trailing_slash() {
        let urls = CheckoutUrls::new("https://shop.example.com/");
        assert_eq!(
            urls.return_url(),
            "https://shop.example.com/return?session_id={CHECKOUT_SESSION_ID}"
        );

        let urls = CheckoutUrls::new("https://shop.example.com");
        assert_eq!(urls.base_url, "https://shop.example.com");
    }

    #[test]
    fn test_cart_line_request_camel_case() {
        let line: CartLineRequest =
            serde_json::from_str(r#"{"priceId":"price_1","quantity":2}"#).unwrap();
        assert_eq!(line, CartLineRequest::new("price_1", 2));

        let line: CartLineRequest = serde_json::from_str(r#"{"quantity":2}"#).unwrap();
        assert!(line.price_id.is_none());
    }

    #[test]
    fn test_wrong_typed_fields_decode_as_missing() {
        let line: CartLineRequest =
            serde_json::from_str(r#"{"priceId":"price_1","quantity":"two"}"#).unwrap();
        assert_eq!(line.price_id.as_deref(), Some("price_1"));
        assert!(line.quantity.is_none());

        let line: CartLineRequest =
            serde_json::from_str(r#"{"priceId":42,"quantity":1}"#).unwrap();
        assert!(line.price_id.is_none());
        assert_eq!(line.quantity, Some(1.0));

        let line: CartLineRequest =
            serde_json::from_str(r#"{"priceId":null,"quantity":null}"#).unwrap();
        assert_eq!(line, CartLineRequest::default());
    }

    #[test]
    fn test_from_json_non_object() {
        assert_eq!(
            CartLineRequest::from_json(serde_json::json!("price_1")),
            CartLineRequest::default()
        );
        assert_eq!(
            CartLineRequest::from_json(serde_json::json!({ "priceId": "price_1", "quantity": 2 })),
            CartLineRequest::new("price_1", 2)
        );
    }

    #[test]
    fn test_embedded_payment_defaults() {
        let request = CheckoutSessionRequest::embedded_payment(
            "https://shop.example.com/return",
            "US",
            vec![ValidatedLineItem {
                price: "price_1".into(),
                quantity: 1,
            }],
        );
        assert_eq!(request.ui_mode.as_str(), "embedded");
        assert_eq!(request.mode.as_str(), "payment");
        assert!(request.automatic_tax);
        assert!(request.allow_promotion_codes);
        assert_eq!(request.shipping_countries, vec!["US".to_string()]);
    }
}
