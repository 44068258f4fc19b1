//! # Payment Provider Trait
//!
//! The seam between the storefront logic and the remote payment API.
//! The catalog cache and cart validator only talk to a `PaymentProvider`;
//! `shop-stripe` supplies the Stripe implementation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProvider (trait)                    │
//! │  ├── list_products()                                        │
//! │  ├── retrieve_price()                                       │
//! │  ├── create_checkout_session()                              │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │  StripeClient │
//!                    └───────────────┘
//! ```

use crate::checkout::{CheckoutSession, CheckoutSessionRequest};
use crate::error::PaymentResult;
use crate::product::{Price, ProductPage};
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;

/// Remote payment API used for catalog reads and checkout.
///
/// Every call is a single network attempt authenticated with `key`.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// List the first page of products, at most `limit` entries.
    async fn list_products(&self, key: &SecretString, limit: u32) -> PaymentResult<ProductPage>;

    /// Retrieve a price, optionally with its product expanded.
    async fn retrieve_price(
        &self,
        key: &SecretString,
        price_id: &str,
        expand_product: bool,
    ) -> PaymentResult<Price>;

    /// Create a checkout session.
    async fn create_checkout_session(
        &self,
        key: &SecretString,
        request: &CheckoutSessionRequest,
    ) -> PaymentResult<CheckoutSession>;

    /// Get the provider name (for logging and error messages).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedProvider = Arc<dyn PaymentProvider>;
