//! HTTP implementation of the cafe API client.
//!
//! Uses `reqwest` for transport and `moka` to cache menu reads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use marigold_core::{CartOwner, CatalogItemId};

use crate::config::CafeApiConfig;

use super::{CafeApiError, CartItemInput, CartStore, CreateOrderRequest, MenuItem, Order, ServerCart};

/// Cached values, keyed by endpoint-shaped strings ("menu:all",
/// "menu:item:{id}").
#[derive(Clone)]
enum CacheValue {
    Menu(Arc<Vec<MenuItem>>),
    Item(Box<MenuItem>),
}

/// Error body shape returned by the cafe API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the cafe API server.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct CafeClient {
    inner: Arc<CafeClientInner>,
}

struct CafeClientInner {
    client: reqwest::Client,
    base_url: String,
    token: String,
    cache: Cache<String, CacheValue>,
}

impl CafeClient {
    /// Create a new cafe API client.
    #[must_use]
    pub fn new(config: &CafeApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(config.menu_cache_seconds))
            .build();

        Self {
            inner: Arc::new(CafeClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                token: config.token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and decode the JSON response.
    ///
    /// Maps the transport-level outcomes every endpoint shares: 429 with
    /// `Retry-After`, 404, other non-success statuses (with the error
    /// body surfaced), and body parse failures.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, CafeApiError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.inner.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CafeApiError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CafeApiError::NotFound(what.to_string()));
        }

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            tracing::error!(
                status = %status,
                %message,
                what,
                "cafe API returned non-success status"
            );
            if status.is_client_error() {
                return Err(CafeApiError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }
            return Err(CafeApiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    what,
                    "failed to parse cafe API response"
                );
                Err(CafeApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Menu Methods
    // =========================================================================

    /// List the full menu. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_menu(&self) -> Result<Arc<Vec<MenuItem>>, CafeApiError> {
        const CACHE_KEY: &str = "menu:all";

        if let Some(CacheValue::Menu(menu)) = self.inner.cache.get(CACHE_KEY).await {
            debug!("cache hit for menu");
            return Ok(menu);
        }

        let items: Vec<MenuItem> = self
            .send(self.inner.client.get(self.url("/menu")), "menu")
            .await?;
        let items = Arc::new(items);

        self.inner
            .cache
            .insert(CACHE_KEY.to_string(), CacheValue::Menu(Arc::clone(&items)))
            .await;

        Ok(items)
    }

    /// Get a single menu item by id. Cached.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist, or another error if
    /// the API request fails.
    #[instrument(skip(self), fields(item = %id))]
    pub async fn get_menu_item(&self, id: &CatalogItemId) -> Result<MenuItem, CafeApiError> {
        let cache_key = format!("menu:item:{id}");

        if let Some(CacheValue::Item(item)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for menu item");
            return Ok(*item);
        }

        let item: MenuItem = self
            .send(
                self.inner.client.get(self.url(&format!("/menu/{id}"))),
                &format!("menu item {id}"),
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Item(Box::new(item.clone())))
            .await;

        Ok(item)
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Create an order from the owner's synchronized cart.
    ///
    /// The cafe API reads the server cart as the source of truth and
    /// consumes (clears) it on success.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the owner has no cart, `Rejected` for
    /// validation failures, or a transport error.
    #[instrument(skip(self, request), fields(owner = %owner))]
    pub async fn create_order(
        &self,
        owner: &CartOwner,
        request: &CreateOrderRequest,
    ) -> Result<Order, CafeApiError> {
        let (key, value) = owner.as_query();
        self.send(
            self.inner
                .client
                .post(self.url("/orders"))
                .query(&[(key, value)])
                .json(request),
            &format!("order for {owner}"),
        )
        .await
    }

    /// Liveness probe against the cafe API, used by the readiness
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), CafeApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/health"))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(CafeApiError::Upstream {
                status: response.status().as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }
}

#[async_trait]
impl CartStore for CafeClient {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn delete_cart(&self, owner: &CartOwner) -> Result<(), CafeApiError> {
        let (key, value) = owner.as_query();
        let response = self
            .inner
            .client
            .delete(self.url("/cart"))
            .query(&[(key, value)])
            .header("Authorization", format!("Bearer {}", self.inner.token))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CafeApiError::NotFound(format!("cart for {owner}")));
        }
        if !status.is_success() {
            return Err(CafeApiError::Upstream {
                status: status.as_u16(),
                message: "cart delete failed".to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(owner = %owner, item = %input.item))]
    async fn add_cart_item(
        &self,
        owner: &CartOwner,
        input: &CartItemInput,
    ) -> Result<ServerCart, CafeApiError> {
        let (key, value) = owner.as_query();
        self.send(
            self.inner
                .client
                .post(self.url("/cart/items"))
                .query(&[(key, value)])
                .json(input),
            &format!("cart add for {owner}"),
        )
        .await
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn get_cart(&self, owner: &CartOwner) -> Result<ServerCart, CafeApiError> {
        let (key, value) = owner.as_query();
        self.send(
            self.inner.client.get(self.url("/cart")).query(&[(key, value)]),
            &format!("cart for {owner}"),
        )
        .await
    }
}
