//! BigCommerce storefront API (GraphQL) client.
//!
//! Uses `graphql_client` for type-checked documents with `reqwest` 0.13 for
//! HTTP. The category tree is cached using `moka` (5-minute TTL).

pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use bc_storefront_core::{CustomerId, LoginCredentials};
use cookie::Cookie;
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::types::LoginSession;
use super::{BigCommerceError, GraphQLError, GraphQLErrorLocation, truncate_body};
use crate::config::BigCommerceConfig;

use queries::{GetCategoryTree, GetCustomerId, Login, get_category_tree, get_customer_id, login};

/// Cookie carrying the shopper's storefront session token.
pub const CUSTOMER_COOKIE: &str = "SHOP_TOKEN";

/// Category tree payload, serialized to the browser as-is.
pub type CategoryTree = get_category_tree::ResponseData;

const CATEGORY_TREE_KEY: &str = "category_tree";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the BigCommerce storefront GraphQL API.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    categories: Cache<&'static str, CategoryTree>,
}

impl StorefrontClient {
    /// Create a new storefront API client.
    #[must_use]
    pub fn new(config: &BigCommerceConfig) -> Self {
        let categories = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.storefront_api_url.to_string(),
                access_token: config.storefront_api_token.clone(),
                categories,
            }),
        }
    }

    /// Execute a GraphQL document and return its data.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        customer_token: Option<&str>,
    ) -> Result<Q::ResponseData, BigCommerceError>
    where
        Q::Variables: serde::Serialize,
    {
        self.execute_with_headers::<Q>(variables, customer_token)
            .await
            .map(|(data, _)| data)
    }

    /// Execute a GraphQL document, also returning the response headers.
    ///
    /// When `customer_token` is given it is sent as the customer session
    /// cookie, which scopes `customer` fields to that shopper.
    async fn execute_with_headers<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        customer_token: Option<&str>,
    ) -> Result<(Q::ResponseData, HeaderMap), BigCommerceError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.inner.access_token.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body);
        if let Some(token) = customer_token {
            request = request.header(COOKIE, format!("{CUSTOMER_COOKIE}={token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BigCommerceError::RateLimited(retry_after));
        }

        let headers = response.headers().clone();
        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate_body(&response_text, 500),
                "BigCommerce storefront API returned non-success status"
            );
            return Err(BigCommerceError::Status {
                status: status.as_u16(),
                body: truncate_body(&response_text, 200),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate_body(&response_text, 500),
                    "Failed to parse BigCommerce GraphQL response"
                );
                return Err(BigCommerceError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(BigCommerceError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        let data = response.data.ok_or_else(|| {
            tracing::error!(
                body = %truncate_body(&response_text, 500),
                "BigCommerce GraphQL response has no data and no errors"
            );
            BigCommerceError::GraphQL(vec![GraphQLError::message("No data in response")])
        })?;

        Ok((data, headers))
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the category tree, three levels deep.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_category_tree(&self) -> Result<CategoryTree, BigCommerceError> {
        if let Some(tree) = self.inner.categories.get(CATEGORY_TREE_KEY).await {
            debug!("Cache hit for category tree");
            return Ok(tree);
        }

        let tree = self
            .execute::<GetCategoryTree>(get_category_tree::Variables, None)
            .await?;

        self.inner
            .categories
            .insert(CATEGORY_TREE_KEY, tree.clone())
            .await;

        Ok(tree)
    }

    // =========================================================================
    // Customer Methods (not cached - per shopper)
    // =========================================================================

    /// Resolve the customer a session token belongs to.
    ///
    /// Returns `None` when the token is not (or no longer) a logged-in
    /// customer session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, customer_token))]
    pub async fn get_customer_id(
        &self,
        customer_token: &str,
    ) -> Result<Option<CustomerId>, BigCommerceError> {
        let data = self
            .execute::<GetCustomerId>(get_customer_id::Variables, Some(customer_token))
            .await?;

        Ok(data
            .customer
            .map(|customer| customer.entity_id)
            .filter(|id| *id > 0)
            .map(CustomerId::new))
    }

    /// Log a customer in.
    ///
    /// On success the storefront API answers with session cookies; they are
    /// returned with their `Domain` attribute removed so the browser stores
    /// them against this service's host.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if BigCommerce rejects the email and
    /// password, or another error if the API request fails.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LoginSession, BigCommerceError> {
        let variables = login::Variables {
            email: credentials.email().to_string(),
            password: credentials.password().to_string(),
        };

        let (data, headers) = match self.execute_with_headers::<Login>(variables, None).await {
            Ok(result) => result,
            Err(BigCommerceError::GraphQL(errors)) if is_invalid_credentials(&errors) => {
                return Err(BigCommerceError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };
        debug!(result = %data.login.result, "Login accepted");

        let set_cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(rescope_cookie)
            .collect();

        Ok(LoginSession { set_cookies })
    }
}

fn convert_graphql_error(e: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: e.message,
        locations: e.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: e.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn is_invalid_credentials(errors: &[GraphQLError]) -> bool {
    errors
        .iter()
        .any(|e| e.message.to_lowercase().contains("invalid credentials"))
}

/// Strip the `Domain` attribute from an upstream `Set-Cookie` value.
fn rescope_cookie(raw: &str) -> Option<String> {
    match Cookie::parse(raw.to_string()) {
        Ok(mut cookie) => {
            cookie.unset_domain();
            Some(cookie.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Dropping unparseable Set-Cookie from storefront API");
            None
        }
    }
}
