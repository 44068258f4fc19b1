//! # shop-stripe
//!
//! Stripe REST client and `PaymentProvider` implementation for
//! storefront-cart-rs.
//!
//! Talks to three Stripe endpoints:
//!
//! 1. `GET /v1/products` - catalog listing (first page)
//! 2. `GET /v1/prices/{id}` - price lookup, optionally with `expand[]=product`
//! 3. `POST /v1/checkout/sessions` - embedded Checkout Session creation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_core::{resolve_secret_key, CatalogCache};
//! use shop_stripe::StripeClient;
//!
//! let client = StripeClient::from_env()?;
//! let key = resolve_secret_key(None)?;
//!
//! let cache = CatalogCache::default();
//! let catalog = cache.get_catalog(&client, &key).await?;
//! ```

pub mod checkout;
pub mod client;
pub mod config;
pub mod provider;

// Re-exports
pub use checkout::checkout_form;
pub use client::{ApiRequest, StripeClient, PROVIDER_NAME};
pub use config::StripeConfig;
