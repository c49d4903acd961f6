//! Country and state lists for address forms.
//!
//! These two endpoints answer with bare JSON arrays, not the `data`
//! envelope, which is what the address form expects.

use axum::{
    Json,
    extract::{Path, State},
};
use bc_storefront_core::CountryCode;

use crate::geography::{CountryRecord, StateRecord};
use crate::state::AppState;

/// All countries.
pub async fn index(State(state): State<AppState>) -> Json<Vec<CountryRecord>> {
    Json(state.geography().countries())
}

/// States of one country. Unknown or malformed codes give an empty list.
pub async fn states(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Vec<StateRecord>> {
    let states = CountryCode::parse(&code)
        .map(|code| state.geography().states_of(&code))
        .unwrap_or_default();
    Json(states)
}
