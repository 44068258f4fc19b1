//! # Payment Error Types
//!
//! Typed error handling for the storefront cart engine.
//! All catalog and checkout operations return `Result<T, PaymentError>`.
//!
//! The `Display` text of every variant is the message returned to clients,
//! so operator-only detail must be logged where the error is raised.

use thiserror::Error;

/// Core error type for all catalog and checkout operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider answered with a body that is not JSON
    #[error("{provider} returned non-JSON response ({status}): {body}")]
    RemoteProtocol {
        provider: String,
        status: u16,
        body: String,
    },

    /// Provider answered with JSON of an unexpected shape
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Provider answered with a non-success status
    #[error("{provider} API error {status}: {message}")]
    RemoteApi {
        provider: String,
        status: u16,
        message: String,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed cart input
    #[error("{0}")]
    InvalidCart(String),

    /// A cart item's price could not be looked up
    #[error("Unable to validate cart items. Please try again.")]
    CartLookupFailed,

    /// Product carries a stock value that is not a number
    #[error("Stock data error for {product}")]
    StockData { product: String },

    /// Requested quantity exceeds the product's stock
    #[error("Sorry, insufficient stock for {product}. Available: {available}")]
    InsufficientStock { product: String, available: String },

    /// Product is archived or otherwise not purchasable
    #[error("Product {product} is no longer available.")]
    ProductUnavailable { product: String },

    /// Provider rejected checkout session creation
    #[error("{0}")]
    CheckoutCreationFailed(String),
}

impl PaymentError {
    /// Returns true if the client-visible message mentions stock
    pub fn is_stock_related(&self) -> bool {
        self.to_string().to_lowercase().contains("stock")
    }

    /// Returns the HTTP status code for a failed checkout request.
    ///
    /// Stock problems are a conflict with current inventory (409);
    /// everything else collapses to 500.
    pub fn status_code(&self) -> u16 {
        if self.is_stock_related() {
            409
        } else {
            500
        }
    }
}

/// Result type alias for catalog and checkout operations
pub type PaymentResult<T> = Result<T, PaymentError>;
