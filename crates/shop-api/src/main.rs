//! # Storefront Cart
//!
//! Catalog and checkout backend for a Stripe-powered storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_KEY=sk_test_...
//! export SITE_URL=https://shop.example.com
//!
//! # Run the server (LOG_FORMAT=json for structured logs)
//! storefront-cart
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.provider.provider_name());
    info!("Catalog TTL: {}s", state.catalog.ttl().as_secs());
    info!("Checkout return URL: {}", state.return_url());

    let app = routes::create_router(state);

    info!("Storefront cart starting on http://{}", addr);

    if !is_prod {
        info!("Catalog: GET http://{}/api/retrieve_product_meta", addr);
        info!("Checkout: POST http://{}/api/create-checkout-session", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

fn print_banner() {
    println!(
        r#"
  Storefront Cart RS
  ━━━━━━━━━━━━━━━━━━
  Catalog + checkout backend
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
