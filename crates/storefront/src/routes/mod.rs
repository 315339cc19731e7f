//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health            - Liveness check
//! GET  /health/ready      - Readiness check (pings the cafe API)
//!
//! # Menu
//! GET  /menu              - Full menu listing
//! GET  /menu/{id}         - Menu item detail
//!
//! # Cart (proxied to the cafe API, addressed by session owner)
//! GET  /cart              - Current cart
//! GET  /cart/count        - Item count badge
//! POST /cart/add          - Add a single item
//!
//! # Checkout
//! POST /checkout          - Reconcile the local cart snapshot and place
//!                           the order
//! ```

pub mod cart;
pub mod checkout;
pub mod menu;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/{id}", get(menu::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::place_order))
}
