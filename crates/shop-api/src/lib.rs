//! # shop-api
//!
//! HTTP API layer for storefront-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Catalog metadata endpoint backed by the TTL catalog cache
//! - Checkout session endpoint with server-side cart validation
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/retrieve_product_meta` | Catalog entries (no stock counts) |
//! | POST | `/api/create-checkout-session` | Create embedded checkout session |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
