//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error is rendered as the JSON envelope the storefront client reads:
//!
//! ```json
//! { "data": null, "errors": [{ "message": "...", "code": "..." }] }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::bigcommerce::BigCommerceError;

/// Message shown when a login is rejected.
pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "Cannot find an account that matches the provided credentials";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// BigCommerce API operation failed.
    #[error("BigCommerce error: {0}")]
    BigCommerce(#[from] BigCommerceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// One entry of the `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorItem {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Always `null`.
    pub data: Option<()>,
    pub errors: Vec<ErrorItem>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BigCommerce(BigCommerceError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::BigCommerce(BigCommerceError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::BigCommerce(BigCommerceError::InvalidPath(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BigCommerce(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing error entry. Upstream and internal details stay in logs.
    #[must_use]
    pub fn item(&self) -> ErrorItem {
        let (message, code) = match self {
            Self::BigCommerce(BigCommerceError::NotFound(_)) => ("Not found".to_string(), None),
            Self::BigCommerce(BigCommerceError::InvalidCredentials) => (
                INVALID_CREDENTIALS_MESSAGE.to_string(),
                Some("invalid_credentials"),
            ),
            Self::BigCommerce(BigCommerceError::InvalidPath(_)) => {
                ("Invalid request".to_string(), None)
            }
            Self::BigCommerce(_) => ("An unexpected error occurred".to_string(), None),
            Self::NotFound(msg) | Self::BadRequest(msg) => (msg.clone(), None),
            Self::Internal(_) => ("Internal server error".to_string(), None),
        };

        ErrorItem { message, code }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ErrorEnvelope {
            data: None,
            errors: vec![self.item()],
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
