//! # Stripe Payment Provider
//!
//! `PaymentProvider` implementation backed by [`StripeClient`].

use crate::client::{ApiRequest, StripeClient, PROVIDER_NAME};
use async_trait::async_trait;
use secrecy::SecretString;
use shop_core::{
    CheckoutSession, CheckoutSessionRequest, PaymentProvider, PaymentResult, Price, ProductPage,
};
use tracing::instrument;

#[async_trait]
impl PaymentProvider for StripeClient {
    #[instrument(skip(self, key))]
    async fn list_products(&self, key: &SecretString, limit: u32) -> PaymentResult<ProductPage> {
        self.request_as(key, ApiRequest::get("/products").query("limit", limit.to_string()))
            .await
    }

    #[instrument(skip(self, key))]
    async fn retrieve_price(
        &self,
        key: &SecretString,
        price_id: &str,
        expand_product: bool,
    ) -> PaymentResult<Price> {
        let mut request = ApiRequest::get("/prices").segment(price_id);
        if expand_product {
            request = request.query("expand[]", "product");
        }
        self.request_as(key, request).await
    }

    async fn create_checkout_session(
        &self,
        key: &SecretString,
        request: &CheckoutSessionRequest,
    ) -> PaymentResult<CheckoutSession> {
        self.create_session(key, request).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
