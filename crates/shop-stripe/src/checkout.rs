//! # Stripe Checkout Sessions
//!
//! Form encoding and creation of embedded Checkout Sessions.

use crate::client::{ApiRequest, StripeClient};
use secrecy::SecretString;
use shop_core::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentResult};
use tracing::{error, info, instrument};

/// Build the form body for `POST /v1/checkout/sessions`
pub fn checkout_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("ui_mode".to_string(), request.ui_mode.as_str().to_string()),
        ("mode".to_string(), request.mode.as_str().to_string()),
        ("return_url".to_string(), request.return_url.clone()),
    ];

    if request.automatic_tax {
        form.push(("automatic_tax[enabled]".to_string(), "true".to_string()));
    }

    for country in &request.shipping_countries {
        form.push((
            "shipping_address_collection[allowed_countries][]".to_string(),
            country.clone(),
        ));
    }

    if request.allow_promotion_codes {
        form.push(("allow_promotion_codes".to_string(), "true".to_string()));
    }

    for (i, item) in request.line_items.iter().enumerate() {
        form.push((format!("line_items[{}][price]", i), item.price.clone()));
        form.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
    }

    form
}

impl StripeClient {
    /// Create a Checkout Session.
    ///
    /// A rejection by Stripe becomes [`PaymentError::CheckoutCreationFailed`]
    /// carrying Stripe's message.
    #[instrument(skip(self, key, request), fields(items = request.line_items.len()))]
    pub async fn create_session(
        &self,
        key: &SecretString,
        request: &CheckoutSessionRequest,
    ) -> PaymentResult<CheckoutSession> {
        let form = checkout_form(request);
        let api_request = ApiRequest::post_form("/checkout/sessions", form);

        let session: CheckoutSession = self
            .request_as(key, api_request)
            .await
            .map_err(|e| {
                error!("Stripe checkout.sessions.create error: {}", e);
                match e {
                    PaymentError::RemoteApi { message, .. } => {
                        PaymentError::CheckoutCreationFailed(message)
                    }
                    other => other,
                }
            })?;

        info!("Created Stripe checkout session: id={}", session.id);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StripeConfig;
    use serde_json::json;
    use shop_core::ValidatedLineItem;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_request() -> CheckoutSessionRequest {
        CheckoutSessionRequest::embedded_payment(
            "https://shop.example.com/return?session_id={CHECKOUT_SESSION_ID}",
            "US",
            vec![
                ValidatedLineItem {
                    price: "price_1".into(),
                    quantity: 2,
                },
                ValidatedLineItem {
                    price: "price_2".into(),
                    quantity: 1,
                },
            ],
        )
    }

    fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_checkout_form() {
        let form = checkout_form(&session_request());

        assert_eq!(value(&form, "ui_mode"), Some("embedded"));
        assert_eq!(value(&form, "mode"), Some("payment"));
        assert_eq!(
            value(&form, "return_url"),
            Some("https://shop.example.com/return?session_id={CHECKOUT_SESSION_ID}")
        );
        assert_eq!(value(&form, "automatic_tax[enabled]"), Some("true"));
        assert_eq!(
            value(&form, "shipping_address_collection[allowed_countries][]"),
            Some("US")
        );
        assert_eq!(value(&form, "allow_promotion_codes"), Some("true"));
        assert_eq!(value(&form, "line_items[0][price]"), Some("price_1"));
        assert_eq!(value(&form, "line_items[0][quantity]"), Some("2"));
        assert_eq!(value(&form, "line_items[1][price]"), Some("price_2"));
        assert_eq!(value(&form, "line_items[1][quantity]"), Some("1"));
    }

    #[tokio::test]
    async fn test_create_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("ui_mode=embedded"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains("allow_promotion_codes=true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_1",
                "object": "checkout.session",
                "client_secret": "cs_test_1_secret_abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            StripeClient::new(StripeConfig::new().with_api_base_url(server.uri())).unwrap();
        let session = client
            .create_session(&SecretString::from("sk_test_1"), &session_request())
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.client_secret.as_deref(), Some("cs_test_1_secret_abc"));
    }

    #[tokio::test]
    async fn test_rejected_session_carries_stripe_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Automatic tax is not enabled for this account" }
            })))
            .mount(&server)
            .await;

        let client =
            StripeClient::new(StripeConfig::new().with_api_base_url(server.uri())).unwrap();
        let err = client
            .create_session(&SecretString::from("sk_test_1"), &session_request())
            .await
            .unwrap_err();

        match err {
            PaymentError::CheckoutCreationFailed(message) => {
                assert_eq!(message, "Automatic tax is not enabled for this account");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
