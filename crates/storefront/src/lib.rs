//! BigCommerce storefront API library.
//!
//! The HTTP service that sits between the browser storefront and the
//! BigCommerce store and storefront APIs. The binary in `main.rs` only adds
//! process setup (configuration, tracing, Sentry, signal handling) around
//! [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bigcommerce;
pub mod config;
pub mod error;
pub mod geography;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = middleware::cors_layer(&state.config().allowed_origins);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check BigCommerce.
async fn health() -> &'static str {
    "ok"
}
