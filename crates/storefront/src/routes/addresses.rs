//! Saved addresses of the logged-in customer.

use axum::{Json, extract::State, http::HeaderMap};
use serde_json::Value;
use tracing::instrument;

use super::extract::{Data, data, request_cookie};
use crate::bigcommerce::CUSTOMER_COOKIE;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List the addresses of the customer behind the `SHOP_TOKEN` cookie.
#[instrument(skip(state, headers))]
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Data<Value>>> {
    let token = request_cookie(&headers, CUSTOMER_COOKIE)
        .ok_or_else(|| AppError::BadRequest("Invalid request".to_string()))?;

    let customer_id = state
        .storefront()
        .get_customer_id(&token)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid request".to_string()))?;

    let addresses = state.store().get_customer_addresses(customer_id).await?;
    Ok(data(addresses))
}
