//! Application state shared across handlers.

use std::sync::Arc;

use crate::bigcommerce::{StoreClient, StorefrontClient};
use crate::config::StorefrontConfig;
use crate::geography::Geography;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("geography dataset: {0}")]
    Geography(#[from] serde_json::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Nothing in it is mutated
/// after startup apart from the category cache inside the storefront client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: StoreClient,
    storefront: StorefrontClient,
    geography: Geography,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded geography dataset cannot be parsed.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let store = StoreClient::new(&config.bigcommerce);
        let storefront = StorefrontClient::new(&config.bigcommerce);
        let geography = Geography::load()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                storefront,
                geography,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the BigCommerce store API client.
    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.inner.store
    }

    /// Get a reference to the BigCommerce storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the country/subdivision dataset.
    #[must_use]
    pub fn geography(&self) -> &Geography {
        &self.inner.geography
    }
}
