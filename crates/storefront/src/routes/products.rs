//! Catalog search.

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use super::extract::{Data, data};
use crate::bigcommerce::{ProductQuery, ProductSearch};
use crate::error::Result;
use crate::state::AppState;

/// Search visible products by keyword, category, brand and sort order.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Data<ProductSearch>>> {
    let products = state.store().get_products(&query).await?;
    tracing::debug!(count = products.len(), "Product search");
    Ok(data(ProductSearch::new(products)))
}
