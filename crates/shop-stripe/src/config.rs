//! # Stripe Configuration
//!
//! Connection settings for the Stripe REST API. The secret key is not part
//! of this config: it is resolved per request by the caller.

use secrecy::{ExposeSecret, SecretString};
use std::env;

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Pinned API version sent with every request
pub const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Create config pointing at the public Stripe API
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `STRIPE_API_BASE` (default `https://api.stripe.com`)
    /// - `STRIPE_API_VERSION`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self {
            api_base_url: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            api_version: env::var("STRIPE_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
        }
    }

    /// Get authorization header value for a secret key
    pub fn auth_header(&self, key: &SecretString) -> String {
        format!("Bearer {}", key.expose_secret())
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new();
        let key = SecretString::from("sk_test_abc123");
        assert_eq!(config.auth_header(&key), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_with_api_base_url() {
        let config = StripeConfig::new().with_api_base_url("http://127.0.0.1:9999");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }
}
