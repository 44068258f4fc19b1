//! # Request Handlers
//!
//! Axum request handlers for the storefront API.
//! Every failure is converted into a JSON `{ "error": ... }` body; the full
//! cause is logged server-side.

use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shop_core::{
    resolve_secret_key, validate_cart, CartLineRequest, CatalogEntry, CheckoutSessionRequest,
    PaymentError, PaymentResult,
};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Items to purchase; kept as raw JSON so malformed items reach the
    /// cart validator
    #[serde(rename = "lineItems", default)]
    pub line_items: Option<Value>,
}

impl CreateCheckoutRequest {
    /// Submitted cart lines. A missing or null `lineItems` is an empty cart.
    pub fn cart_items(self) -> PaymentResult<Vec<CartLineRequest>> {
        match self.line_items {
            None => Ok(Vec::new()),
            Some(Value::Array(values)) => {
                Ok(values.into_iter().map(CartLineRequest::from_json).collect())
            }
            Some(_) => Err(PaymentError::InvalidCart("Invalid cart items".to_string())),
        }
    }
}

/// Create checkout session response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Secret the storefront uses to mount embedded checkout
    pub client_secret: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, err: &PaymentError) -> ApiError {
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// Checkout errors: stock problems are 409, everything else 500
fn checkout_error_response(err: &PaymentError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, err)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-cart",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": state.catalog.status().await,
    }))
}

/// Catalog metadata with internal stock counts removed
#[instrument(skip(state))]
pub async fn retrieve_product_meta(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    let entries = load_catalog(&state).await.map_err(|e| {
        error!("Error loading product metadata: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
    })?;

    info!("Returning products: {}", entries.len());
    Ok(Json(entries))
}

async fn load_catalog(state: &AppState) -> PaymentResult<Vec<CatalogEntry>> {
    let key = resolve_secret_key(state.runtime_env.as_deref())?;
    let entries = state
        .catalog
        .get_catalog(state.provider.as_ref(), &key)
        .await?;

    Ok(entries.iter().map(CatalogEntry::without_stock).collect())
}

/// Validate the cart and create an embedded checkout session
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    create_checkout_internal(&state, &body)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error creating checkout session: {}", e);
            checkout_error_response(&e)
        })
}

async fn create_checkout_internal(
    state: &AppState,
    body: &[u8],
) -> PaymentResult<CreateCheckoutResponse> {
    let key = resolve_secret_key(state.runtime_env.as_deref())?;

    let request: CreateCheckoutRequest = serde_json::from_slice(body).map_err(|e| {
        error!("Undecodable checkout request body: {}", e);
        PaymentError::InvalidCart("Invalid request body".to_string())
    })?;

    let items = request.cart_items()?;
    if items.is_empty() {
        return Err(PaymentError::InvalidCart("No line items provided".to_string()));
    }

    let line_items = validate_cart(state.provider.as_ref(), &key, &items).await?;

    let session_request = CheckoutSessionRequest::embedded_payment(
        state.return_url(),
        state.config.shipping_country.as_str(),
        line_items,
    );

    info!(
        "Creating checkout session: {} items, return_url={}",
        session_request.line_items.len(),
        session_request.return_url
    );

    let session = state
        .provider
        .create_checkout_session(&key, &session_request)
        .await?;

    let client_secret = session.client_secret.ok_or_else(|| {
        PaymentError::CheckoutCreationFailed(format!(
            "Failed to create {} checkout session",
            state.provider.provider_name()
        ))
    })?;

    info!("Created checkout session: {}", session.id);
    Ok(CreateCheckoutResponse { client_secret })
}
