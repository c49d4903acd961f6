//! Request and response shapes exchanged with BigCommerce.
//!
//! Entities themselves (carts, orders, products, addresses) stay as
//! `serde_json::Value`: they are owned by BigCommerce and forwarded to the
//! browser unchanged. Only the inputs this service builds are typed.

use bc_storefront_core::{BrandId, CategoryId, ProductId, ProductSort, VariantId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of products returned by a catalog search.
pub const PRODUCT_PAGE_SIZE: u32 = 20;

// =============================================================================
// Cart
// =============================================================================

/// Cart item as submitted by the storefront client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Line item in the store API's cart payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub quantity: u32,
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
}

impl From<&CartItemInput> for LineItem {
    fn from(item: &CartItemInput) -> Self {
        Self {
            // A missing (or zero) quantity means one unit.
            quantity: item.quantity.filter(|q| *q > 0).unwrap_or(1),
            product_id: item.product_id,
            variant_id: item.variant_id,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Product search parameters from the storefront query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductQuery {
    /// Free-text keyword.
    #[serde(default)]
    pub search: Option<String>,
    /// Category entity id.
    #[serde(default)]
    pub category: Option<String>,
    /// Brand entity id.
    #[serde(default)]
    pub brand: Option<String>,
    /// One of the [`ProductSort`] names.
    #[serde(default)]
    pub sort: Option<String>,
}

impl ProductQuery {
    /// Query parameters for `GET /v3/catalog/products`.
    ///
    /// Non-numeric category/brand ids and unknown sort names are dropped
    /// rather than rejected, so a stale link still lists products.
    #[must_use]
    pub fn to_store_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("is_visible".to_string(), "true".to_string()),
            ("include".to_string(), "variants,images".to_string()),
            ("limit".to_string(), PRODUCT_PAGE_SIZE.to_string()),
        ];

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("keyword".to_string(), search.to_string()));
        }

        if let Some(category) = self
            .category
            .as_deref()
            .and_then(|c| c.parse::<CategoryId>().ok())
        {
            params.push(("categories:in".to_string(), category.to_string()));
        }

        if let Some(brand) = self.brand.as_deref().and_then(|b| b.parse::<BrandId>().ok()) {
            params.push(("brand_id".to_string(), brand.to_string()));
        }

        if let Some(sort) = self
            .sort
            .as_deref()
            .and_then(|s| s.parse::<ProductSort>().ok())
        {
            params.push(("sort".to_string(), sort.field().to_string()));
            params.push(("direction".to_string(), sort.direction().as_str().to_string()));
        }

        params
    }
}

/// Catalog search result returned to the storefront.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSearch {
    pub products: Vec<Value>,
    pub found: bool,
}

impl ProductSearch {
    #[must_use]
    pub fn new(products: Vec<Value>) -> Self {
        let found = !products.is_empty();
        Self { products, found }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order together with its line items, exactly as fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    pub order: Value,
    pub products: Value,
}

// =============================================================================
// Login
// =============================================================================

/// Outcome of a successful storefront login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginSession {
    /// `Set-Cookie` values to pass on to the browser.
    pub set_cookies: Vec<String>,
}
