//! Application state shared across handlers.

use std::sync::Arc;

use crate::cafe_api::CafeClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the cafe API
/// client (which carries its own connection pool and cache).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cafe: CafeClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let cafe = CafeClient::new(&config.cafe_api);
        Self {
            inner: Arc::new(AppStateInner { config, cafe }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cafe API client.
    #[must_use]
    pub fn cafe(&self) -> &CafeClient {
        &self.inner.cafe
    }
}
