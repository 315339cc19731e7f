//! Cafe API client.
//!
//! # Architecture
//!
//! - The cafe API server (a document store behind JSON REST) is the
//!   source of truth for the catalog, carts, and orders - the storefront
//!   keeps no copy of its own
//! - Menu reads are cached in-memory via `moka` (5 minute TTL by default)
//! - Cart operations are expressed through the [`CartStore`] trait so the
//!   checkout reconciliation pipeline can be exercised against an
//!   in-memory fake in tests; [`CafeClient`] is the HTTP implementation
//!
//! # Example
//!
//! ```rust,ignore
//! use marigold_storefront::cafe_api::{CafeClient, CartStore};
//!
//! let client = CafeClient::new(&config.cafe_api);
//!
//! let menu = client.list_menu().await?;
//! let cart = client.get_cart(&owner).await?;
//! ```

mod client;
pub mod types;

pub use client::CafeClient;
pub use types::*;

use async_trait::async_trait;
use marigold_core::CartOwner;
use thiserror::Error;

/// Errors that can occur when talking to the cafe API.
#[derive(Debug, Error)]
pub enum CafeApiError {
    /// HTTP request failed (connect, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API rejected the request (4xx with a message body).
    #[error("Cafe API rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the API's error body.
        message: String,
    },

    /// The API returned a server-side failure (5xx).
    #[error("Cafe API failure ({status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Message from the API's error body, possibly truncated.
        message: String,
    },
}

impl CafeApiError {
    /// Whether this error means the addressed document does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The three cart operations the storefront consumes from the cafe API.
///
/// The checkout synchronizer is written against this trait; production
/// code uses [`CafeClient`], tests use an in-memory fake.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Delete the owner's cart. Returns `NotFound` if no cart exists.
    async fn delete_cart(&self, owner: &CartOwner) -> Result<(), CafeApiError>;

    /// Add a single item to the owner's cart, creating the cart if it
    /// does not exist yet. Returns the updated cart.
    async fn add_cart_item(
        &self,
        owner: &CartOwner,
        input: &CartItemInput,
    ) -> Result<ServerCart, CafeApiError>;

    /// Fetch the owner's cart. Returns `NotFound` if no cart exists.
    async fn get_cart(&self, owner: &CartOwner) -> Result<ServerCart, CafeApiError>;
}
