//! Order detail for the logged-in customer.
//!
//! The order and its line items are fetched concurrently. Failures are
//! reported by kind: an order BigCommerce does not know is a 404, anything
//! else that goes wrong upstream is a 502.

use axum::{Json, extract::State};
use bc_storefront_core::OrderId;
use serde::Deserialize;
use tracing::instrument;

use super::extract::{Data, JsonBody, data};
use crate::bigcommerce::{BigCommerceError, OrderDetails};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub customer_token: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// Fetch an order and its products.
#[instrument(skip(state, body), fields(order_id))]
pub async fn show(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<OrderRequest>,
) -> Result<Json<Data<OrderDetails>>> {
    let customer_id = match body.customer_token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => state
            .storefront()
            .get_customer_id(token)
            .await?,
        None => None,
    };

    let (Some(customer_id), Some(order_id)) = (customer_id, body.order_id) else {
        return Err(AppError::BadRequest("Invalid request".to_string()));
    };
    tracing::Span::current().record("order_id", order_id.as_i64());
    tracing::debug!(customer_id = %customer_id, "Fetching order");

    let store = state.store();
    let (order, products) = tokio::try_join!(
        store.get_order(order_id),
        store.get_order_products(order_id),
    )
    .map_err(upstream_error)?;

    Ok(data(OrderDetails { order, products }))
}

/// Failures of the two order fetches; a 404 means the order is unknown.
fn upstream_error(e: BigCommerceError) -> AppError {
    match e {
        BigCommerceError::NotFound(path) => {
            tracing::debug!(path = %path, "Order not found upstream");
            AppError::NotFound("Order not found".to_string())
        }
        other => AppError::BigCommerce(other),
    }
}
