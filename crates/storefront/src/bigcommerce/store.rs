//! BigCommerce store API (REST) client.
//!
//! Every request goes through [`StoreClient::apply_store_auth`], which
//! attaches the store credentials. Responses are returned as JSON values;
//! v3 endpoints wrap their payload in a `data` member, which is unwrapped
//! here so callers see the entity itself.

use std::sync::Arc;

use bc_storefront_core::{CartId, CartItemId, CustomerId, OrderId};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use super::types::{LineItem, ProductQuery};
use super::{BigCommerceError, truncate_body};
use crate::config::BigCommerceConfig;

/// Cookie carrying the shopper's cart id.
pub const CART_COOKIE: &str = "bc_cartId";

/// Header carrying the store API client id.
pub const AUTH_CLIENT_HEADER: &str = "X-Auth-Client";

/// Header carrying the store API access token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Sub-resources expanded on every cart response.
const CART_INCLUDE: &str = "line_items.physical_items.options";

// =============================================================================
// StoreClient
// =============================================================================

/// Client for the BigCommerce store (management) API.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    client_id: String,
    access_token: SecretString,
}

impl StoreClient {
    /// Create a new store API client.
    #[must_use]
    pub fn new(config: &BigCommerceConfig) -> Self {
        Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.store_api_url.clone(),
                client_id: config.store_api_client_id.clone(),
                access_token: config.store_api_token.clone(),
            }),
        }
    }

    /// Attach the store credentials to an outbound request.
    ///
    /// Empty credentials still produce (empty) headers.
    #[must_use]
    pub fn apply_store_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTH_CLIENT_HEADER, &self.inner.client_id)
            .header(AUTH_TOKEN_HEADER, self.inner.access_token.expose_secret())
    }

    /// Absolute URL for a store API path such as `/v2/orders/5`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build an authenticated request for an arbitrary store API path.
    ///
    /// Used by the pass-through proxy. `path` is the decoded path; each of
    /// its segments is escaped again when appended to the store base URL, so
    /// `%`, `?` and `#` stay inside their segment. Dot segments are refused.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the path contains `.` or `..` segments.
    pub fn proxy_request(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
    ) -> Result<RequestBuilder, BigCommerceError> {
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        if segments.iter().any(|segment| *segment == ".." || *segment == ".") {
            return Err(BigCommerceError::InvalidPath(path.to_string()));
        }

        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BigCommerceError::InvalidPath(path.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query.filter(|q| !q.is_empty()));

        Ok(self.apply_store_auth(self.inner.client.request(method, url)))
    }

    /// Send a JSON request and decode the JSON response.
    ///
    /// Returns `Ok(None)` for empty (e.g. `204 No Content`) responses.
    async fn send<Q>(
        &self,
        method: Method,
        path: &str,
        query: &Q,
        body: Option<Value>,
    ) -> Result<Option<Value>, BigCommerceError>
    where
        Q: Serialize + ?Sized,
    {
        let mut request = self
            .apply_store_auth(self.inner.client.request(method, self.endpoint(path)))
            .header(ACCEPT, "application/json")
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("X-Rate-Limit-Time-Reset-Ms")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map_or(1, |ms| ms.div_ceil(1000));
            return Err(BigCommerceError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(BigCommerceError::NotFound(path.to_string()));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %truncate_body(&response_text, 500),
                "BigCommerce store API returned non-success status"
            );
            return Err(BigCommerceError::Status {
                status: status.as_u16(),
                body: truncate_body(&response_text, 200),
            });
        }

        if status == StatusCode::NO_CONTENT || response_text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&response_text).map(Some).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate_body(&response_text, 500),
                "Failed to parse BigCommerce store API response"
            );
            BigCommerceError::Parse(e)
        })
    }

    /// `GET` a path and require a body.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, BigCommerceError> {
        self.send(Method::GET, path, query, None)
            .await?
            .ok_or_else(|| BigCommerceError::NotFound(path.to_string()))
    }

    // =========================================================================
    // Order Methods (v2)
    // =========================================================================

    /// Get an order record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist, or an error if the API
    /// request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Value, BigCommerceError> {
        self.get(&format!("/v2/orders/{order_id}"), &[]).await
    }

    /// Get the line items of an order.
    ///
    /// An order without products comes back as an empty array.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist, or an error if the API
    /// request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_products(&self, order_id: OrderId) -> Result<Value, BigCommerceError> {
        let products = self
            .send(
                Method::GET,
                &format!("/v2/orders/{order_id}/products"),
                &[] as &[(&str, &str)],
                None,
            )
            .await?;
        Ok(products.unwrap_or_else(|| Value::Array(Vec::new())))
    }

    // =========================================================================
    // Customer Methods (v3)
    // =========================================================================

    /// List a customer's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn get_customer_addresses(
        &self,
        customer_id: CustomerId,
    ) -> Result<Value, BigCommerceError> {
        let customer = customer_id.to_string();
        let body = self
            .get("/v3/customers/addresses", &[("customer_id:in", customer.as_str())])
            .await?;
        Ok(unwrap_data(body))
    }

    // =========================================================================
    // Catalog Methods (v3)
    // =========================================================================

    /// Search visible catalog products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, query: &ProductQuery) -> Result<Vec<Value>, BigCommerceError> {
        let params = query.to_store_params();
        let body = self
            .send(Method::GET, "/v3/catalog/products", &params, None)
            .await?
            .unwrap_or(Value::Null);

        match unwrap_data(body) {
            Value::Array(products) => Ok(products),
            Value::Null => Ok(Vec::new()),
            other => {
                debug!(payload = %other, "Unexpected catalog payload");
                Err(BigCommerceError::Status {
                    status: StatusCode::OK.as_u16(),
                    body: "catalog response is not a list".to_string(),
                })
            }
        }
    }

    // =========================================================================
    // Cart Methods (v3, not cached - mutable state)
    // =========================================================================

    /// Get a cart, or `None` if it no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails for any other reason.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Option<Value>, BigCommerceError> {
        match self
            .send(
                Method::GET,
                &format!("/v3/carts/{cart_id}"),
                &[("include", CART_INCLUDE)],
                None,
            )
            .await
        {
            Ok(body) => Ok(body.map(unwrap_data)),
            Err(BigCommerceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a cart holding the given line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line_items))]
    pub async fn create_cart(&self, line_items: &[LineItem]) -> Result<Value, BigCommerceError> {
        let body = self
            .send(
                Method::POST,
                "/v3/carts",
                &[("include", CART_INCLUDE)],
                Some(json!({ "line_items": line_items })),
            )
            .await?;
        body.map(unwrap_data)
            .ok_or_else(|| empty_response("/v3/carts"))
    }

    /// Add line items to an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart does not exist or the API request fails.
    #[instrument(skip(self, line_items), fields(cart_id = %cart_id))]
    pub async fn add_cart_items(
        &self,
        cart_id: &CartId,
        line_items: &[LineItem],
    ) -> Result<Value, BigCommerceError> {
        let path = format!("/v3/carts/{cart_id}/items");
        let body = self
            .send(
                Method::POST,
                &path,
                &[("include", CART_INCLUDE)],
                Some(json!({ "line_items": line_items })),
            )
            .await?;
        body.map(unwrap_data).ok_or_else(|| empty_response(&path))
    }

    /// Replace one line item of a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart or item does not exist or the API
    /// request fails.
    #[instrument(skip(self, line_item), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        cart_id: &CartId,
        item_id: &CartItemId,
        line_item: &LineItem,
    ) -> Result<Value, BigCommerceError> {
        let path = format!("/v3/carts/{cart_id}/items/{item_id}");
        let body = self
            .send(
                Method::PUT,
                &path,
                &[("include", CART_INCLUDE)],
                Some(json!({ "line_item": line_item })),
            )
            .await?;
        body.map(unwrap_data).ok_or_else(|| empty_response(&path))
    }

    /// Remove one line item from a cart.
    ///
    /// Returns `None` when BigCommerce answers with no content, which it
    /// does when the last item was removed and the cart deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart or item does not exist or the API
    /// request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn remove_cart_item(
        &self,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> Result<Option<Value>, BigCommerceError> {
        let body = self
            .send(
                Method::DELETE,
                &format!("/v3/carts/{cart_id}/items/{item_id}"),
                &[("include", CART_INCLUDE)],
                None,
            )
            .await?;
        Ok(body.map(unwrap_data))
    }
}

/// Strip the v3 `{"data": ..., "meta": ...}` envelope.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn empty_response(path: &str) -> BigCommerceError {
    BigCommerceError::Status {
        status: StatusCode::NO_CONTENT.as_u16(),
        body: format!("empty response from {path}"),
    }
}
