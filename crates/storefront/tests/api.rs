//! Router-level tests for the storefront API.
//!
//! BigCommerce is replaced by an `httpmock` server that stands in for both
//! the store API (mounted under `/stores/abc`) and the storefront GraphQL
//! endpoint (`/graphql`). Requests are driven through the full router with
//! `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use bc_storefront::config::{BigCommerceConfig, StorefrontConfig};
use bc_storefront::state::AppState;
use httpmock::prelude::*;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

const STORE: &str = "/stores/abc";

fn app_for(server: &MockServer) -> Router {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        allowed_origins: Vec::new(),
        static_dir: None,
        bigcommerce: BigCommerceConfig {
            store_api_url: Url::parse(&server.url(STORE)).unwrap(),
            store_api_client_id: "client-id".to_string(),
            store_api_token: SecretString::from("store-token"),
            storefront_api_url: Url::parse(&server.url("/graphql")).unwrap(),
            storefront_api_token: SecretString::from("sf-token"),
        },
        sentry_dsn: None,
        sentry_environment: None,
    };
    bc_storefront::app(AppState::new(config).unwrap())
}

fn store_path(path: &str) -> String {
    format!("{STORE}{path}")
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestResponse {
    fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }
}

async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn mock_customer(server: &MockServer, token: &str, entity_id: i64) {
    let cookie = format!("SHOP_TOKEN={token}");
    server
        .mock_async(move |when, then| {
            when.method(POST)
                .path("/graphql")
                .header("cookie", cookie)
                .body_contains(r#""operationName":"GetCustomerId""#);
            then.status(200)
                .json_body(json!({"data": {"customer": {"entityId": entity_id}}}));
        })
        .await;
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = MockServer::start_async().await;
    let response = app_for(&server).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let server = MockServer::start_async().await;
    let response = send(app_for(&server), get("/api/nope")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["data"], Value::Null);
    assert_eq!(response.body["errors"][0]["message"], "Not found");
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_id_comes_from_first_path_segment() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(store_path("/v3/carts/123"))
                .query_param("include", "line_items.physical_items.options")
                .header("x-auth-client", "client-id")
                .header("x-auth-token", "store-token");
            then.status(200)
                .json_body(json!({"data": {"id": "123", "line_items": {}}, "meta": {}}));
        })
        .await;

    let response = send(app_for(&server), get("/api/cart/123/anything/else")).await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"data": {"id": "123", "line_items": {}}})
    );
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_cart_without_id_is_null() {
    let server = MockServer::start_async().await;
    let response = send(app_for(&server), get("/api/cart")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"data": null}));
}

#[tokio::test]
async fn test_expired_cart_clears_cookie() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(store_path("/v3/carts/gone"));
            then.status(404).json_body(json!({"status": 404, "title": "Not Found"}));
        })
        .await;

    let response = send(app_for(&server), get("/api/cart/gone")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"data": null}));
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("bc_cartId="));
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_add_item_creates_cart_and_sets_cookie() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(store_path("/v3/carts"))
                .json_body(json!({"line_items": [{"quantity": 1, "product_id": 77}]}));
            then.status(200)
                .json_body(json!({"data": {"id": "new-cart", "base_amount": 10}}));
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(Method::POST, "/api/cart", &json!({"item": {"productId": 77}})),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], "new-cart");
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("bc_cartId=new-cart"));
    assert!(cookies[0].contains("Max-Age=2592000"));
}

#[tokio::test]
async fn test_add_item_to_existing_cart() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(store_path("/v3/carts/c-1/items"))
                .json_body(json!({
                    "line_items": [{"quantity": 2, "product_id": 77, "variant_id": 5}]
                }));
            then.status(200).json_body(json!({"data": {"id": "c-1"}}));
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/cart/c-1",
            &json!({"item": {"productId": 77, "variantId": 5, "quantity": 2}}),
        ),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies()[0].starts_with("bc_cartId=c-1"));
}

#[tokio::test]
async fn test_add_without_item_is_rejected() {
    let server = MockServer::start_async().await;
    let response = send(
        app_for(&server),
        json_request(Method::POST, "/api/cart/c-1", &json!({})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"data": null, "errors": [{"message": "Missing item"}]})
    );
}

#[tokio::test]
async fn test_update_item() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(store_path("/v3/carts/c-1/items/line-9"))
                .json_body(json!({"line_item": {"quantity": 4, "product_id": 77}}));
            then.status(200).json_body(json!({"data": {"id": "c-1"}}));
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::PUT,
            "/api/cart/c-1",
            &json!({"itemId": "line-9", "item": {"productId": 77, "quantity": 4}}),
        ),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"data": {"id": "c-1"}}));
}

#[tokio::test]
async fn test_update_requires_cart_item_and_item_id() {
    let server = MockServer::start_async().await;
    let app = app_for(&server);
    let item = json!({"productId": 77});

    for (uri, body) in [
        ("/api/cart", json!({"itemId": "line-9", "item": item})),
        ("/api/cart/c-1", json!({"item": item})),
        ("/api/cart/c-1", json!({"itemId": "line-9"})),
    ] {
        let response = send(app.clone(), json_request(Method::PUT, uri, &body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri} {body}");
        assert_eq!(response.body["errors"][0]["message"], "Invalid request");
    }
}

#[tokio::test]
async fn test_removing_last_item_clears_cookie() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path(store_path("/v3/carts/c-1/items/line-9"));
            then.status(204);
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(Method::DELETE, "/api/cart/c-1", &json!({"itemId": "line-9"})),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"data": null}));
    assert!(response.set_cookies()[0].contains("Max-Age=0"));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_without_customer_token_is_invalid() {
    let server = MockServer::start_async().await;
    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/orders",
            &json!({"customerToken": null, "orderId": 5}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"data": null, "errors": [{"message": "Invalid request"}]})
    );
}

#[tokio::test]
async fn test_order_without_order_id_is_invalid() {
    let server = MockServer::start_async().await;
    mock_customer(&server, "tok", 7).await;

    let response = send(
        app_for(&server),
        json_request(Method::POST, "/api/orders", &json!({"customerToken": "tok"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["message"], "Invalid request");
}

#[tokio::test]
async fn test_order_returns_both_payloads() {
    let server = MockServer::start_async().await;
    mock_customer(&server, "tok", 7).await;
    let order = json!({"id": 105, "customer_id": 7, "status": "Shipped"});
    let products = json!([{"id": 1, "order_id": 105, "name": "Mug", "quantity": 2}]);
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(store_path("/v2/orders/105"))
                .header("x-auth-token", "store-token");
            then.status(200).json_body(order.clone());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(store_path("/v2/orders/105/products"));
            then.status(200).json_body(products.clone());
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/orders",
            &json!({"customerToken": "tok", "orderId": 105}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"data": {"order": order, "products": products}})
    );
}

#[tokio::test]
async fn test_missing_order_is_404() {
    let server = MockServer::start_async().await;
    mock_customer(&server, "tok", 7).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/v2/orders/404");
            then.status(404).json_body(json!([{"status": 404}]));
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/orders",
            &json!({"customerToken": "tok", "orderId": "404"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({"data": null, "errors": [{"message": "Order not found"}]})
    );
}

#[tokio::test]
async fn test_upstream_failure_is_502() {
    let server = MockServer::start_async().await;
    mock_customer(&server, "tok", 7).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(store_path("/v2/orders/9"));
            then.status(200).json_body(json!({"id": 9}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(store_path("/v2/orders/9/products"));
            then.status(500).body("boom");
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/orders",
            &json!({"customerToken": "tok", "orderId": 9}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.body,
        json!({"data": null, "errors": [{"message": "An unexpected error occurred"}]})
    );
}

#[tokio::test]
async fn test_customer_lookup_failure_is_502() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql");
            then.status(404).body("missing");
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/orders",
            &json!({"customerToken": "tok", "orderId": 9}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.body,
        json!({"data": null, "errors": [{"message": "An unexpected error occurred"}]})
    );
}

// =============================================================================
// Customer
// =============================================================================

#[tokio::test]
async fn test_login_forwards_cookies() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("authorization", "Bearer sf-token")
                .body_contains(r#""operationName":"Login""#);
            then.status(200)
                .header(
                    "set-cookie",
                    "SHOP_TOKEN=session-1; Domain=store-abc.mybigcommerce.com; Path=/; HttpOnly",
                )
                .json_body(json!({"data": {"login": {"result": "success"}}}));
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/login",
            &json!({"email": "shopper@example.com", "password": "secret"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"data": null}));
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("SHOP_TOKEN=session-1"));
    assert!(!cookies[0].contains("Domain"));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body(json!({
                "data": null,
                "errors": [{"message": "Invalid credentials"}]
            }));
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(
            Method::POST,
            "/api/login",
            &json!({"email": "shopper@example.com", "password": "wrong"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["errors"][0]["code"], "invalid_credentials");
    assert_eq!(
        response.body["errors"][0]["message"],
        "Cannot find an account that matches the provided credentials"
    );
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let server = MockServer::start_async().await;
    let response = send(
        app_for(&server),
        json_request(Method::POST, "/api/login", &json!({"email": "a@b.c"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_addresses_of_logged_in_customer() {
    let server = MockServer::start_async().await;
    mock_customer(&server, "tok", 7).await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(store_path("/v3/customers/addresses"))
                .query_param("customer_id:in", "7");
            then.status(200).json_body(json!({
                "data": [{"id": 1, "customer_id": 7, "city": "Austin"}],
                "meta": {"pagination": {"total": 1}}
            }));
        })
        .await;

    let request = Request::builder()
        .uri("/api/addresses")
        .header(header::COOKIE, "SHOP_TOKEN=tok")
        .body(Body::empty())
        .unwrap();
    let response = send(app_for(&server), request).await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"data": [{"id": 1, "customer_id": 7, "city": "Austin"}]})
    );
}

#[tokio::test]
async fn test_addresses_without_session() {
    let server = MockServer::start_async().await;
    let response = send(app_for(&server), get("/api/addresses")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_product_search() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(store_path("/v3/catalog/products"))
                .query_param("keyword", "mug")
                .query_param("categories:in", "23")
                .query_param("sort", "total_sold")
                .query_param("direction", "desc")
                .query_param("is_visible", "true");
            then.status(200)
                .json_body(json!({"data": [{"id": 1, "name": "Mug"}], "meta": {}}));
        })
        .await;

    let response = send(
        app_for(&server),
        get("/api/products?search=mug&category=23&sort=trending-desc"),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"data": {"products": [{"id": 1, "name": "Mug"}], "found": true}})
    );
}

#[tokio::test]
async fn test_categories_forward_data_member() {
    let server = MockServer::start_async().await;
    let tree = json!({"site": {"categoryTree": [{
        "name": "Kitchen",
        "path": "/kitchen/",
        "entityId": 18,
        "description": "",
        "productCount": 4,
        "children": []
    }]}});
    server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body(json!({"data": tree}));
        })
        .await;

    let response = send(app_for(&server), get("/api/categories")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, tree);
}

// =============================================================================
// Geography
// =============================================================================

#[tokio::test]
async fn test_countries_shape() {
    let server = MockServer::start_async().await;
    let response = send(app_for(&server), get("/api/countries")).await;

    assert_eq!(response.status, StatusCode::OK);
    let countries = response.body.as_array().unwrap();
    assert!(countries.len() > 200);
    for country in countries {
        assert_eq!(country["name"], country["sortname"]);
        assert_eq!(country["id"].as_str().unwrap().len(), 2);
    }
    assert!(countries.contains(&json!({"name": "Canada", "sortname": "Canada", "id": "CA"})));
}

#[tokio::test]
async fn test_states_shape() {
    let server = MockServer::start_async().await;
    let response = send(app_for(&server), get("/api/countries/CA/states")).await;

    assert_eq!(response.status, StatusCode::OK);
    let states = response.body.as_array().unwrap();
    assert_eq!(states.len(), 13);
    assert!(states.contains(&json!({"name": "Ontario", "id": "ON"})));

    let response = send(app_for(&server), get("/api/countries/XX/states")).await;
    assert_eq!(response.body, json!([]));
}

// =============================================================================
// Store API pass-through
// =============================================================================

#[tokio::test]
async fn test_store_proxy_injects_credentials() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(store_path("/v3/catalog/brands"))
                .query_param("name", "Acme")
                .header("x-auth-client", "client-id")
                .header("x-auth-token", "store-token")
                .header("x-request-id", "req-42");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"data": [{"id": 3}]}));
        })
        .await;

    let request = Request::builder()
        .uri("/api/store/v3/catalog/brands?name=Acme")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = send(app_for(&server), request).await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"data": [{"id": 3}]}));
}

#[tokio::test]
async fn test_store_proxy_relays_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(store_path("/v3/customers"));
            then.status(422)
                .header("content-type", "application/json")
                .json_body(json!({"title": "Unprocessable"}));
        })
        .await;

    let response = send(
        app_for(&server),
        json_request(Method::POST, "/api/store/v3/customers", &json!([{}])),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body, json!({"title": "Unprocessable"}));
}

#[tokio::test]
async fn test_store_proxy_rejects_dot_segments() {
    let server = MockServer::start_async().await;
    let response = send(app_for(&server), get("/api/store/v3/../../admin")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_proxy_keeps_encoded_dots_inside_store() {
    let server = MockServer::start_async().await;
    let outside = server
        .mock_async(|when, then| {
            when.method(GET).path("/other/v2/orders");
            then.status(200).json_body(json!({"outside": true}));
        })
        .await;

    let response = send(
        app_for(&server),
        get("/api/store/%252e%252e/%252e%252e/other/v2/orders"),
    )
    .await;

    outside.assert_hits_async(0).await;
    assert_ne!(response.status, StatusCode::OK);
}
