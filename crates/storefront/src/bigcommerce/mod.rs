//! BigCommerce store and storefront API clients.
//!
//! # Architecture
//!
//! - BigCommerce is the source of truth - NO local state, direct API calls
//! - [`StoreClient`] talks to the REST store (management) API and injects
//!   the `X-Auth-Client` / `X-Auth-Token` headers on every request
//! - [`StorefrontClient`] talks to the storefront GraphQL API with a bearer
//!   token, using `graphql-client` for type-checked documents
//! - The category tree is cached in memory via `moka` (5 minute TTL)
//!
//! # APIs
//!
//! ## Store API (REST)
//! - `/v2/orders/{id}` and `/v2/orders/{id}/products`
//! - `/v3/carts` and its item sub-resources
//! - `/v3/catalog/products`
//! - `/v3/customers/addresses`
//!
//! ## Storefront API (GraphQL)
//! - Category tree (three levels deep)
//! - Customer login and customer id lookup by customer token
//!
//! # Example
//!
//! ```rust,ignore
//! use bc_storefront::bigcommerce::StoreClient;
//!
//! let store = StoreClient::new(&config.bigcommerce);
//! let order = store.get_order(OrderId::new(105)).await?;
//! ```

mod store;
mod storefront;
pub mod types;

pub use store::{CART_COOKIE, StoreClient};
pub use storefront::{CUSTOMER_COOKIE, CategoryTree, StorefrontClient};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with BigCommerce APIs.
#[derive(Debug, Error)]
pub enum BigCommerceError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Upstream returned {status}: {body}")]
    Status {
        /// HTTP status code from BigCommerce.
        status: u16,
        /// Truncated response body for diagnostics.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by BigCommerce.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Login rejected the email/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A request path could not be turned into an upstream URL.
    #[error("Invalid upstream path: {0}")]
    InvalidPath(String),
}

/// A GraphQL error returned by the storefront API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Keep at most `limit` characters of an upstream body for logs and errors.
pub(crate) fn truncate_body(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigcommerce_error_display() {
        let err = BigCommerceError::NotFound("/v2/orders/5".to_string());
        assert_eq!(err.to_string(), "Not found: /v2/orders/5");

        let err = BigCommerceError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned 503: maintenance");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = BigCommerceError::GraphQL(vec![
            GraphQLError::message("Field not found"),
            GraphQLError::message("Invalid ID"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 3, column: 7 }],
            path: vec![
                serde_json::Value::String("site".to_string()),
                serde_json::Value::String("categoryTree".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = BigCommerceError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: site.categoryTree.0 at line 3:7"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = BigCommerceError::GraphQL(vec![GraphQLError::message("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = BigCommerceError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("abcdef", 3), "abc");
        assert_eq!(truncate_body("ab", 10), "ab");
    }
}
