//! # Product Types
//!
//! Product and price types as returned by the payment provider, plus the
//! `CatalogEntry` display projection served to the storefront.
//!
//! Provider types deserialize strictly: a missing required field or a field
//! of the wrong type is a decoding error rather than a silent default.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key holding the internal stock count of a product
pub const STOCK_METADATA_KEY: &str = "stock";

/// A reference that the provider returns either as a bare ID or, when
/// expanded, as the full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    /// Bare identifier
    Id(String),
    /// Embedded object
    Object(Box<T>),
}

impl<T> Expandable<T> {
    /// Returns the embedded object, if expanded
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Object(obj) => Some(obj),
            Expandable::Id(_) => None,
        }
    }
}

/// A product in the provider's catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Provider product identifier (e.g. "prod_...")
    pub id: String,

    /// Display name
    pub name: String,

    /// Whether the product is available for purchase
    pub active: bool,

    /// Default price, as an ID or expanded object
    #[serde(default)]
    pub default_price: Option<Expandable<Price>>,

    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,

    /// Free-form metadata (may carry `stock`)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Product {
    /// Create an active product with no price, images or metadata
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            default_price: None,
            images: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Builder: set the default price reference
    pub fn with_default_price(mut self, price: Expandable<Price>) -> Self {
        self.default_price = Some(price);
        self
    }

    /// Builder: add an image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Builder: add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builder: set the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Raw stock metadata value, if any
    pub fn stock(&self) -> Option<&str> {
        self.metadata.get(STOCK_METADATA_KEY).map(String::as_str)
    }
}

/// A price attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Provider price identifier (e.g. "price_...")
    pub id: String,

    /// Owning product, as an ID or expanded object
    pub product: Expandable<Product>,

    /// Amount in the smallest currency unit (cents for USD)
    #[serde(default)]
    pub unit_amount: Option<i64>,

    /// ISO 4217 currency code, lowercase
    pub currency: String,
}

impl Price {
    /// Create a price in cents for a product referenced by ID
    pub fn from_cents(
        id: impl Into<String>,
        product_id: impl Into<String>,
        unit_amount: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            product: Expandable::Id(product_id.into()),
            unit_amount: Some(unit_amount),
            currency: currency.into(),
        }
    }

    /// Formatted decimal amount (e.g. "19.99")
    pub fn display_amount(&self) -> String {
        format_minor_units(self.unit_amount)
    }
}

/// One page of a product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    /// More products exist beyond this page
    #[serde(default)]
    pub has_more: bool,
}

/// Format minor units as a fixed two-decimal string; a missing amount is zero.
pub fn format_minor_units(amount: Option<i64>) -> String {
    let amount = amount.unwrap_or(0);
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Storefront projection of a product and its resolved price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product ID
    pub id: String,
    /// Product name
    pub name: String,
    /// Resolved price ID (omitted when the product has no price)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    /// Decimal price string
    pub price: String,
    /// Primary image (omitted when the product has none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// All images
    pub image_array: Vec<String>,
    /// Product metadata
    pub metadata: HashMap<String, String>,
}

impl CatalogEntry {
    /// Project a product and its resolved price.
    ///
    /// Metadata is copied as-is, stock included; strip it with
    /// [`CatalogEntry::without_stock`] before exposing the entry.
    pub fn from_parts(product: &Product, price: Option<&Price>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price_id: price.map(|p| p.id.clone()),
            price: format_minor_units(price.and_then(|p| p.unit_amount)),
            image: product.images.first().cloned(),
            image_array: product.images.clone(),
            metadata: product.metadata.clone(),
        }
    }

    /// Copy of this entry safe for clients (no internal stock count)
    pub fn without_stock(&self) -> Self {
        let mut entry = self.clone();
        entry.metadata.remove(STOCK_METADATA_KEY);
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_minor_units() {
        assert_eq!(format_minor_units(Some(1999)), "19.99");
        assert_eq!(format_minor_units(Some(5)), "0.05");
        assert_eq!(format_minor_units(Some(100000)), "1000.00");
        assert_eq!(format_minor_units(None), "0.00");
        assert_eq!(format_minor_units(Some(-250)), "-2.50");
    }

    #[test]
    fn test_price_with_expanded_product() {
        let price: Price = serde_json::from_value(json!({
            "id": "price_1",
            "object": "price",
            "unit_amount": 1999,
            "currency": "usd",
            "product": {
                "id": "prod_1",
                "object": "product",
                "name": "Widget",
                "active": true,
                "metadata": { "stock": "3" }
            }
        }))
        .unwrap();

        let product = price.product.as_object().unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.stock(), Some("3"));
        assert_eq!(price.display_amount(), "19.99");
    }

    #[test]
    fn test_product_with_price_id() {
        let product: Product = serde_json::from_value(json!({
            "id": "prod_1",
            "name": "Widget",
            "active": true,
            "default_price": "price_1",
            "images": ["https://img/1.png"]
        }))
        .unwrap();

        assert_eq!(
            product.default_price,
            Some(Expandable::Id("price_1".to_string()))
        );
        assert!(product.metadata.is_empty());
    }

    #[test]
    fn test_decoding_fails_closed() {
        // name missing
        let result: Result<Product, _> = serde_json::from_value(json!({
            "id": "prod_1",
            "active": true
        }));
        assert!(result.is_err());

        // unit_amount of the wrong type
        let result: Result<Price, _> = serde_json::from_value(json!({
            "id": "price_1",
            "product": "prod_1",
            "unit_amount": "1999",
            "currency": "usd"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_entry_projection() {
        let product = Product::new("prod_1", "Widget")
            .with_image("https://img/1.png")
            .with_image("https://img/2.png")
            .with_metadata("stock", "7")
            .with_metadata("color", "red");
        let price = Price::from_cents("price_1", "prod_1", 2500, "usd");

        let entry = CatalogEntry::from_parts(&product, Some(&price));
        assert_eq!(entry.price_id.as_deref(), Some("price_1"));
        assert_eq!(entry.price, "25.00");
        assert_eq!(entry.image.as_deref(), Some("https://img/1.png"));
        assert_eq!(entry.image_array.len(), 2);
        assert_eq!(entry.metadata.get("stock").map(String::as_str), Some("7"));

        let public = entry.without_stock();
        assert!(!public.metadata.contains_key("stock"));
        assert_eq!(public.metadata.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_catalog_entry_without_price_or_images() {
        let entry = CatalogEntry::from_parts(&Product::new("prod_2", "Gadget"), None);
        assert_eq!(entry.price_id, None);
        assert_eq!(entry.price, "0.00");
        assert_eq!(entry.image, None);

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("price_id").is_none());
        assert!(json.get("image").is_none());
        assert_eq!(json["image_array"], json!([]));
        assert_eq!(json["price"], "0.00");
    }
}
