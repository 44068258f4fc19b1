//! # Cart Validation
//!
//! Re-checks a client-submitted cart against live provider data before a
//! checkout session is created. Items are validated one at a time, in order,
//! and the first failure aborts the whole cart: either every line item is
//! returned or none is.

use crate::checkout::{CartLineRequest, ValidatedLineItem};
use crate::error::{PaymentError, PaymentResult};
use crate::product::Product;
use crate::provider::PaymentProvider;
use futures::stream::{self, StreamExt, TryStreamExt};
use secrecy::SecretString;
use tracing::{debug, error, instrument};

/// Validate every line of a cart.
///
/// Each item is checked for well-formed input, then its price is fetched with
/// the product expanded, and the product's stock and active flag are enforced.
#[instrument(skip(provider, key, items), fields(items = items.len()))]
pub async fn validate_cart(
    provider: &dyn PaymentProvider,
    key: &SecretString,
    items: &[CartLineRequest],
) -> PaymentResult<Vec<ValidatedLineItem>> {
    if items.is_empty() {
        return Err(PaymentError::InvalidCart("Invalid cart items".to_string()));
    }

    stream::iter(items)
        .then(|item| validate_item(provider, key, item))
        .try_collect()
        .await
}

async fn validate_item(
    provider: &dyn PaymentProvider,
    key: &SecretString,
    item: &CartLineRequest,
) -> PaymentResult<ValidatedLineItem> {
    let (price_id, quantity) = parse_item(item)?;

    let price = provider
        .retrieve_price(key, price_id, true)
        .await
        .map_err(|e| {
            error!("Error retrieving price {}: {}", price_id, e);
            PaymentError::CartLookupFailed
        })?;

    let product = price.product.as_object().ok_or_else(|| {
        error!("Price {} was returned without its product expanded", price_id);
        PaymentError::CartLookupFailed
    })?;

    check_stock(product, quantity)?;

    if !product.active {
        let name = if product.name.is_empty() {
            price_id
        } else {
            product.name.as_str()
        };
        return Err(PaymentError::ProductUnavailable {
            product: name.to_string(),
        });
    }

    debug!("Validated {} x {}", quantity, price_id);
    Ok(ValidatedLineItem {
        price: price_id.to_string(),
        quantity,
    })
}

/// Extract a non-empty price ID and a positive integral quantity.
fn parse_item(item: &CartLineRequest) -> PaymentResult<(&str, u32)> {
    let invalid = || PaymentError::InvalidCart("Invalid item data".to_string());

    let price_id = item
        .price_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(invalid)?;

    let quantity = item
        .quantity
        .filter(|q| *q > 0.0 && q.fract() == 0.0 && *q <= f64::from(u32::MAX))
        .ok_or_else(invalid)?;

    Ok((price_id, quantity as u32))
}

/// Enforce the product's `stock` metadata, when present.
fn check_stock(product: &Product, quantity: u32) -> PaymentResult<()> {
    let Some(raw) = product.stock() else {
        return Ok(());
    };

    // blank stock counts as none left
    let trimmed = raw.trim();
    let parsed = if trimmed.is_empty() {
        Ok(0.0)
    } else {
        trimmed.parse::<f64>()
    };

    let available: f64 = match parsed {
        Ok(value) if value.is_finite() => value,
        _ => {
            error!("Invalid stock value {:?} for product {}", raw, product.id);
            return Err(PaymentError::StockData {
                product: product.name.clone(),
            });
        }
    };

    if f64::from(quantity) > available {
        return Err(PaymentError::InsufficientStock {
            product: product.name.clone(),
            available: format_stock(available),
        });
    }

    Ok(())
}

fn format_stock(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
