//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment provider, the catalog cache, the platform secret
//! bindings and configuration.

use shop_core::{BoxedProvider, CatalogCache, CheckoutUrls, RuntimeEnv};
use shop_stripe::StripeClient;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Storefront base URL used in production
    pub site_url: String,
    /// Storefront base URL used everywhere else
    pub local_site_url: String,
    /// Catalog cache time-to-live
    pub catalog_ttl: Duration,
    /// Only country shipping addresses are collected for
    pub shipping_country: String,
    /// TOML file of platform secret bindings (e.g. `STRIPE_KEY = "..."`)
    pub runtime_env_file: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:4321".to_string()),
            local_site_url: std::env::var("LOCAL_SITE_URL")
                .unwrap_or_else(|_| "http://localhost:4321".to_string()),
            catalog_ttl: std::env::var("CATALOG_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(shop_core::DEFAULT_CATALOG_TTL),
            shipping_country: std::env::var("SHIPPING_COUNTRY")
                .unwrap_or_else(|_| "US".to_string()),
            runtime_env_file: std::env::var("RUNTIME_ENV_FILE").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Checkout URLs for the storefront of the current environment
    pub fn checkout_urls(&self) -> CheckoutUrls {
        if self.is_production() {
            CheckoutUrls::new(&self.site_url)
        } else {
            CheckoutUrls::new(&self.local_site_url)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Remote payment provider
    pub provider: BoxedProvider,
    /// Catalog cache (one per process)
    pub catalog: Arc<CatalogCache>,
    /// Platform secret bindings, if the platform provides any
    pub runtime_env: Option<Arc<RuntimeEnv>>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let stripe = StripeClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        let runtime_env = match &config.runtime_env_file {
            Some(path) => Some(load_runtime_env(path)?),
            None => None,
        };

        Ok(Self::with_provider(config, Arc::new(stripe))
            .with_runtime_env(runtime_env))
    }

    /// Create state around an explicit provider
    pub fn with_provider(config: AppConfig, provider: BoxedProvider) -> Self {
        let catalog = Arc::new(CatalogCache::new(config.catalog_ttl));
        Self {
            provider,
            catalog,
            runtime_env: None,
            config,
        }
    }

    /// Builder: set platform secret bindings
    pub fn with_runtime_env(mut self, runtime_env: Option<RuntimeEnv>) -> Self {
        self.runtime_env = runtime_env.map(Arc::new);
        self
    }

    /// Return URL with session ID placeholder
    pub fn return_url(&self) -> String {
        self.config.checkout_urls().return_url()
    }
}

/// Load platform secret bindings from a TOML file
fn load_runtime_env(path: &str) -> anyhow::Result<RuntimeEnv> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
    let env = parse_runtime_env(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
    tracing::info!("Loaded {} runtime bindings from {}", env.len(), path);
    Ok(env)
}

fn parse_runtime_env(content: &str) -> Result<RuntimeEnv, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            site_url: "https://shop.example.com/".to_string(),
            local_site_url: "http://localhost:4321".to_string(),
            catalog_ttl: shop_core::DEFAULT_CATALOG_TTL,
            shipping_country: "US".to_string(),
            runtime_env_file: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_checkout_urls_follow_environment() {
        let mut config = test_config();
        assert_eq!(
            config.checkout_urls().return_url(),
            "http://localhost:4321/return?session_id={CHECKOUT_SESSION_ID}"
        );

        config.environment = "production".to_string();
        assert_eq!(
            config.checkout_urls().return_url(),
            "https://shop.example.com/return?session_id={CHECKOUT_SESSION_ID}"
        );
    }

    #[test]
    fn test_parse_runtime_env() {
        let env = parse_runtime_env("STRIPE_KEY = \"sk_test_platform\"\n").unwrap();
        assert_eq!(env.get("STRIPE_KEY").map(String::as_str), Some("sk_test_platform"));

        assert!(parse_runtime_env("STRIPE_KEY = 42").is_err());
    }
}
