//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /health - Health check (also served at /)
///   - GET  /api/retrieve_product_meta - Cached catalog, stock stripped
///   - POST /api/create-checkout-session - Validate cart, create session
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/retrieve_product_meta", get(handlers::retrieve_product_meta))
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
