//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BIGCOMMERCE_STORE_API_URL` - Store (management) API base URL,
//!   e.g. `https://api.bigcommerce.com/stores/{store_hash}`
//! - `BIGCOMMERCE_STOREFRONT_API_URL` - Storefront GraphQL endpoint,
//!   e.g. `https://store-{store_hash}.mybigcommerce.com/graphql`
//!
//! ## Optional
//! - `BIGCOMMERCE_STORE_API_CLIENT_ID` - Sent as `X-Auth-Client` (default: empty)
//! - `BIGCOMMERCE_STORE_API_TOKEN` - Sent as `X-Auth-Token` (default: empty)
//! - `BIGCOMMERCE_STOREFRONT_API_TOKEN` - Bearer token for GraphQL (default: empty)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_ALLOWED_ORIGINS` - Comma-separated CORS origins (default: any)
//! - `STOREFRONT_STATIC_DIR` - Directory holding the built single-page app
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! Credentials are not validated. An empty credential still produces the
//! corresponding header; the commerce backend is the one to reject it.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed to call the API from a browser (empty = any)
    pub allowed_origins: Vec<String>,
    /// Built single-page app served for client-side routes
    pub static_dir: Option<PathBuf>,
    /// BigCommerce API configuration
    pub bigcommerce: BigCommerceConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// BigCommerce API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct BigCommerceConfig {
    /// Store API base URL (REST, v2 and v3 endpoints hang off it)
    pub store_api_url: Url,
    /// Store API client id (`X-Auth-Client`)
    pub store_api_client_id: String,
    /// Store API access token (`X-Auth-Token`)
    pub store_api_token: SecretString,
    /// Storefront GraphQL endpoint
    pub storefront_api_url: Url,
    /// Storefront GraphQL bearer token
    pub storefront_api_token: SecretString,
}

impl std::fmt::Debug for BigCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BigCommerceConfig")
            .field("store_api_url", &self.store_api_url.as_str())
            .field("store_api_client_id", &self.store_api_client_id)
            .field("store_api_token", &"[REDACTED]")
            .field("storefront_api_url", &self.storefront_api_url.as_str())
            .field("storefront_api_token", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let allowed_origins = parse_origin_list(&get_env_or_default("STOREFRONT_ALLOWED_ORIGINS", ""));
        let static_dir = get_optional_env("STOREFRONT_STATIC_DIR").map(PathBuf::from);

        let bigcommerce = BigCommerceConfig::from_env()?;

        Ok(Self {
            host,
            port,
            allowed_origins,
            static_dir,
            bigcommerce,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BigCommerceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store_api_url: get_required_url("BIGCOMMERCE_STORE_API_URL")?,
            store_api_client_id: get_env_or_default("BIGCOMMERCE_STORE_API_CLIENT_ID", ""),
            store_api_token: SecretString::from(get_env_or_default(
                "BIGCOMMERCE_STORE_API_TOKEN",
                "",
            )),
            storefront_api_url: get_required_url("BIGCOMMERCE_STOREFRONT_API_URL")?,
            storefront_api_token: SecretString::from(get_env_or_default(
                "BIGCOMMERCE_STOREFRONT_API_TOKEN",
                "",
            )),
        })
    }

    /// Names of credentials that are configured as empty strings.
    ///
    /// Startup logs these as a warning; requests still go out with empty
    /// header values.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_api_client_id.is_empty() {
            missing.push("BIGCOMMERCE_STORE_API_CLIENT_ID");
        }
        if self.store_api_token.expose_secret().is_empty() {
            missing.push("BIGCOMMERCE_STORE_API_TOKEN");
        }
        if self.storefront_api_token.expose_secret().is_empty() {
            missing.push("BIGCOMMERCE_STOREFRONT_API_TOKEN");
        }
        missing
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable and parse it as an absolute URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
