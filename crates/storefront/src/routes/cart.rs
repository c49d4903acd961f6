//! Cart route handlers.
//!
//! The browser addresses its cart through the URL: `/api/cart/{cartId}/...`.
//! Only the first segment after the mount point matters; anything after it
//! is ignored. The id is turned into the `bc_cartId` session cookie that the
//! handlers work from, and every response carries the refreshed (or
//! cleared) cookie back to the browser.

use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{HeaderValue, header::SET_COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use bc_storefront_core::{CartId, CartItemId};
use cookie::{Cookie, time::Duration};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::extract::{Data, JsonBody};
use crate::bigcommerce::{CART_COOKIE, CartItemInput, LineItem};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Lifetime of the cart cookie.
const CART_COOKIE_MAX_AGE: Duration = Duration::days(30);

// =============================================================================
// Cart session
// =============================================================================

/// Cart id carried by the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSession {
    cart_id: Option<CartId>,
}

impl CartSession {
    /// Read the cart id from a path relative to the cart mount point.
    ///
    /// `/123/anything` yields `123`; `/`, `//123` and the empty path yield
    /// no cart.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the segment is not a usable cart id.
    pub fn from_path(path: &str) -> Result<Self> {
        let segment = path
            .strip_prefix('/')
            .unwrap_or(path)
            .split('/')
            .next()
            .unwrap_or("");
        if segment.is_empty() {
            return Ok(Self::default());
        }

        let cart_id = CartId::parse(segment).map_err(|e| {
            tracing::debug!(error = %e, "Rejected cart id");
            AppError::BadRequest("Invalid cart id".to_string())
        })?;
        Ok(Self {
            cart_id: Some(cart_id),
        })
    }

    #[must_use]
    pub const fn cart_id(&self) -> Option<&CartId> {
        self.cart_id.as_ref()
    }

    /// The session as a request cookie, `bc_cartId=<id>`.
    #[must_use]
    pub fn cookie(&self) -> Option<Cookie<'static>> {
        self.cart_id
            .as_ref()
            .map(|id| Cookie::new(CART_COOKIE, id.to_string()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CartSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        // Nested routers see the path with the mount point stripped
        Self::from_path(parts.uri.path())
    }
}

/// `Set-Cookie` value storing the cart id for thirty days.
fn cart_cookie(cart_id: &str) -> Cookie<'static> {
    Cookie::build((CART_COOKIE, cart_id.to_string()))
        .path("/")
        .max_age(CART_COOKIE_MAX_AGE)
        .build()
}

/// `Set-Cookie` value deleting the cart cookie.
fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((CART_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// `{"data": cart}` with a cookie update.
fn cart_response(cart: Option<Value>, cookie: Option<Cookie<'static>>) -> Response {
    let mut response = Json(Data { data: cart }).into_response();
    if let Some(cookie) = cookie
        && let Ok(value) = HeaderValue::from_str(&cookie.to_string())
    {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// Cookie pointing at the cart BigCommerce returned.
fn cookie_for(cart: &Value) -> Option<Cookie<'static>> {
    cart.get("id").and_then(Value::as_str).map(cart_cookie)
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct AddItemBody {
    #[serde(default)]
    pub item: Option<CartItemInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemBody {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub item: Option<CartItemInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemBody {
    #[serde(default)]
    pub item_id: Option<String>,
}

fn invalid_request() -> AppError {
    AppError::BadRequest("Invalid request".to_string())
}

fn parse_item_id(item_id: Option<&str>) -> Result<CartItemId> {
    item_id
        .filter(|id| !id.is_empty())
        .and_then(|id| CartItemId::parse(id).ok())
        .ok_or_else(invalid_request)
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the current cart.
///
/// A cart BigCommerce no longer knows is reported as `null` and its cookie
/// is cleared.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, session: CartSession) -> Result<Response> {
    let Some(cart_id) = session.cart_id() else {
        return Ok(cart_response(None, None));
    };

    match state.store().get_cart(cart_id).await? {
        Some(cart) => Ok(cart_response(Some(cart), None)),
        None => {
            tracing::debug!(cart_id = %cart_id, "Cart expired");
            Ok(cart_response(None, Some(removal_cookie())))
        }
    }
}

/// Add an item, creating the cart if there is none yet.
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    session: CartSession,
    JsonBody(body): JsonBody<AddItemBody>,
) -> Result<Response> {
    let Some(item) = body.item else {
        return Err(AppError::BadRequest("Missing item".to_string()));
    };
    let line_items = [LineItem::from(&item)];

    let product_id = item.product_id.to_string();
    add_breadcrumb("cart", "Add item", Some(&[("product_id", product_id.as_str())]));

    let cart = match session.cart_id() {
        Some(cart_id) => state.store().add_cart_items(cart_id, &line_items).await?,
        None => state.store().create_cart(&line_items).await?,
    };

    let cookie = cookie_for(&cart);
    Ok(cart_response(Some(cart), cookie))
}

/// Replace one item of the cart.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    session: CartSession,
    JsonBody(body): JsonBody<UpdateItemBody>,
) -> Result<Response> {
    let cart_id = session.cart_id().ok_or_else(invalid_request)?;
    let item_id = parse_item_id(body.item_id.as_deref())?;
    let item = body.item.ok_or_else(invalid_request)?;

    let cart = state
        .store()
        .update_cart_item(cart_id, &item_id, &LineItem::from(&item))
        .await?;

    let cookie = cookie_for(&cart);
    Ok(cart_response(Some(cart), cookie))
}

/// Remove one item from the cart.
///
/// Removing the last item deletes the cart, so the cookie goes with it.
#[instrument(skip(state, body))]
pub async fn remove(
    State(state): State<AppState>,
    session: CartSession,
    JsonBody(body): JsonBody<RemoveItemBody>,
) -> Result<Response> {
    let cart_id = session.cart_id().ok_or_else(invalid_request)?;
    let item_id = parse_item_id(body.item_id.as_deref())?;

    match state.store().remove_cart_item(cart_id, &item_id).await? {
        Some(cart) => {
            let cookie = cookie_for(&cart);
            Ok(cart_response(Some(cart), cookie))
        }
        None => Ok(cart_response(None, Some(removal_cookie()))),
    }
}
