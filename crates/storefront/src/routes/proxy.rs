//! Pass-through to the BigCommerce store API.
//!
//! `ANY /api/store/{*path}` is sent to `{store_api_url}/{path}` with the
//! store credentials attached. Method, query string, body and the
//! content negotiation headers go upstream; status, content type and body
//! come back unchanged.

use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method, header},
    response::Response,
};
use tracing::instrument;

use crate::bigcommerce::BigCommerceError;
use crate::error::{AppError, Result};
use crate::middleware::{REQUEST_ID_HEADER, RequestId};
use crate::state::AppState;

/// Request headers relayed to the store API.
const FORWARDED_HEADERS: [header::HeaderName; 2] = [header::CONTENT_TYPE, header::ACCEPT];

/// Forward one request to the store API.
#[instrument(skip(state, headers, request_id, body), fields(method = %method))]
pub async fn forward(
    State(state): State<AppState>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    request_id: Option<axum::Extension<RequestId>>,
    body: Bytes,
) -> Result<Response> {
    let mut request = state
        .store()
        .proxy_request(method, &path, query.as_deref())?;

    for name in FORWARDED_HEADERS {
        if let Some(value) = headers.get(&name) {
            request = request.header(name, value);
        }
    }
    if let Some(axum::Extension(id)) = request_id {
        request = request.header(REQUEST_ID_HEADER, id.as_str());
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = request.send().await.map_err(BigCommerceError::from)?;
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await.map_err(BigCommerceError::from)?;

    tracing::debug!(status = %status, path = %path, "Store API proxied");

    let mut response = Response::builder().status(status);
    if let Some(content_type) = content_type {
        response = response.header(header::CONTENT_TYPE, content_type);
    }
    response
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

