//! # shop-core
//!
//! Core types and logic for the storefront-cart engine.
//!
//! This crate provides:
//! - `PaymentProvider` trait for the remote payment API
//! - `Product`, `Price` and the `CatalogEntry` storefront projection
//! - `CatalogCache`, a TTL-bounded snapshot of the provider catalog
//! - `validate_cart` for all-or-nothing cart validation against live data
//! - `resolve_secret_key` for locating the provider credential
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{resolve_secret_key, validate_cart, CatalogCache, CartLineRequest};
//!
//! let key = resolve_secret_key(None)?;
//!
//! // Serve the catalog (fetched at most once per TTL)
//! let cache = CatalogCache::default();
//! let entries = cache.get_catalog(provider.as_ref(), &key).await?;
//!
//! // Validate a cart before checkout
//! let items = vec![CartLineRequest::new("price_123", 2)];
//! let line_items = validate_cart(provider.as_ref(), &key, &items).await?;
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod credential;
pub mod error;
pub mod product;
pub mod provider;

// Re-exports for convenience
pub use cart::validate_cart;
pub use catalog::{CacheStatus, CatalogCache, DEFAULT_CATALOG_TTL, PRODUCT_PAGE_LIMIT};
pub use checkout::{
    CartLineRequest, CheckoutMode, CheckoutSession, CheckoutSessionRequest, CheckoutUrls, UiMode,
    ValidatedLineItem,
};
pub use credential::{resolve_secret_key, RuntimeEnv, SECRET_KEY_VAR};
pub use error::{PaymentError, PaymentResult};
pub use product::{
    format_minor_units, CatalogEntry, Expandable, Price, Product, ProductPage, STOCK_METADATA_KEY,
};
pub use provider::{BoxedProvider, PaymentProvider};
pub use secrecy::SecretString;
