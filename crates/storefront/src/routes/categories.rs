//! Category navigation tree.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::bigcommerce::CategoryTree;
use crate::error::Result;
use crate::state::AppState;

/// The category tree three levels deep, as the storefront API's `data`
/// member (`{"site": {"categoryTree": [...]}}`).
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<CategoryTree>> {
    Ok(Json(state.storefront().get_category_tree().await?))
}
