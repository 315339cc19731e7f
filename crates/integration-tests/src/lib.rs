//! Integration tests for Marigold Cafe.
//!
//! # Running Tests
//!
//! These tests require a running storefront and a reachable cafe API:
//!
//! ```bash
//! # Start the cafe API server, then the storefront
//! cargo run -p marigold-storefront
//!
//! # Run integration tests
//! cargo test -p marigold-integration-tests -- --ignored
//! ```
//!
//! The storefront location is configurable via `STOREFRONT_BASE_URL`
//! (default `http://localhost:3000`).

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so the guest session (and
/// with it the cart owner) persists across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A well-formed 24-hex product reference that (almost certainly) does
/// not exist in the catalog.
pub const MISSING_PRODUCT_REF: &str = "ffffffffffffffffffffffff";
