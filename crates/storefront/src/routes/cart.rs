//! Cart route handlers.
//!
//! The server cart lives in the cafe API; these handlers address it by
//! the session's cart owner (signed-in user id or guest token) and return
//! JSON views. A missing cart is rendered as an empty one rather than an
//! error - shoppers without a cart are the normal case.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use marigold_core::CartOwner;

use crate::cafe_api::{CafeApiError, CartItemInput, CartStore, ServerCart};
use crate::error::{AppError, Result};
use crate::models::{CartView, LocalCartLine, resolve_owner};
use crate::state::AppState;

/// Add-to-cart request body: a single local line.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    #[serde(flatten)]
    pub line: LocalCartLine,
}

/// Cart count response.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

/// Show the current cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let owner = resolve_owner(&session).await?;

    let view = match state.cafe().get_cart(&owner).await {
        Ok(cart) => CartView::from(&cart),
        Err(e) if e.is_not_found() => CartView::empty(),
        Err(e) => {
            tracing::warn!(owner = %owner, error = %e, "failed to fetch cart, showing empty");
            CartView::empty()
        }
    };

    Ok(Json(view))
}

/// Get the cart item count.
#[instrument(skip(state, session))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartCountResponse>> {
    let owner = resolve_owner(&session).await?;
    let count = badge_count(&owner, state.cafe().get_cart(&owner).await);

    Ok(Json(CartCountResponse { count }))
}

/// Render a cart fetch result as the badge count.
///
/// A missing cart counts zero, the normal case for fresh shoppers. A
/// transport failure also renders zero, but is logged rather than
/// silently blending in with the empty case.
fn badge_count(owner: &CartOwner, fetched: std::result::Result<ServerCart, CafeApiError>) -> u32 {
    match fetched {
        Ok(cart) => cart.total_quantity(),
        Err(e) if e.is_not_found() => 0,
        Err(e) => {
            tracing::warn!(owner = %owner, error = %e, "failed to fetch cart count, showing zero");
            0
        }
    }
}

/// Add a single item to the cart.
///
/// Creates the server cart implicitly on the first successful add.
#[instrument(skip(state, session, request))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let input: CartItemInput = request
        .line
        .to_input()
        .ok_or_else(|| AppError::BadRequest("invalid product reference".to_string()))?;

    let owner = resolve_owner(&session).await?;
    let cart = state.cafe().add_cart_item(&owner, &input).await?;

    Ok(Json(CartView::from(&cart)))
}
