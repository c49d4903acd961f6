//! HTTP route handlers for storefront.
//!
//! Every API route parses its input, makes one BigCommerce call and writes
//! the JSON result back.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Customer
//! POST /api/login                       - Log in, forwards session cookies
//! GET  /api/addresses                   - Addresses of the SHOP_TOKEN customer
//! POST /api/orders                      - Order + products ({customerToken, orderId})
//!
//! # Catalog
//! GET  /api/products                    - Product search (search, category, brand, sort)
//! GET  /api/categories                  - Category tree, three levels deep
//!
//! # Cart (cart id is the first segment after /api/cart)
//! GET    /api/cart[/{cartId}[/...]]     - Current cart
//! POST   /api/cart[/{cartId}[/...]]     - Add item (creates the cart if needed)
//! PUT    /api/cart/{cartId}[/...]       - Update item
//! DELETE /api/cart/{cartId}[/...]       - Remove item
//!
//! # Geography
//! GET  /api/countries                   - Countries
//! GET  /api/countries/{code}/states     - States of a country
//!
//! # Store API pass-through
//! ANY  /api/store/{*path}               - Proxied with store credentials
//!
//! # Single-page app
//! GET  /*                               - index.html for client routes, static assets
//! ```

pub mod addresses;
pub mod cart;
pub mod categories;
pub mod countries;
pub mod extract;
pub mod login;
pub mod orders;
pub mod products;
pub mod proxy;
pub mod spa;

use axum::{
    Router,
    routing::{any, get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
///
/// The same handlers serve the bare mount point and any path below it.
pub fn cart_routes() -> Router<AppState> {
    let handlers = || {
        get(cart::show)
            .post(cart::add)
            .put(cart::update)
            .delete(cart::remove)
    };

    Router::new()
        .route("/", handlers())
        .route("/{*rest}", handlers())
}

/// Create the geography routes router.
pub fn country_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(countries::index))
        .route("/{code}/states", get(countries::states))
}

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(addresses::index))
        .route("/products", get(products::index))
        .route("/login", post(login::login))
        .route("/categories", get(categories::index))
        .route("/orders", post(orders::show))
        .route("/store/{*path}", any(proxy::forward))
        .nest("/cart", cart_routes())
        .nest("/countries", country_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .fallback(spa::fallback)
}
