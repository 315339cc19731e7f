//! Checkout route handler.
//!
//! Sequences the reconciliation pipeline and order creation:
//! validate -> synchronize -> verify -> create order. Each abort surfaces
//! as a retryable JSON error (see [`crate::checkout::CheckoutError`]);
//! there is no automatic retry, the shopper re-submits.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use marigold_core::{OrderId, OrderStatus};

use crate::cafe_api::CreateOrderRequest;
use crate::checkout;
use crate::error::Result;
use crate::models::{LocalCartLine, resolve_owner};
use crate::state::AppState;

/// Checkout request: the shopper's full Local Cart Snapshot plus
/// order-level details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// The local cart snapshot, in cart order.
    #[serde(default)]
    pub lines: Vec<LocalCartLine>,
    /// Selected payment method identifier.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Order-level note to the baristas.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Checkout response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub order_id: OrderId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    /// How many snapshot lines made it into the order, out of how many
    /// were replayed. Lets the client tell the shopper when an item was
    /// dropped (e.g., removed from the menu since they added it).
    pub lines_placed: usize,
    pub lines_attempted: usize,
}

/// Place an order from the shopper's local cart snapshot.
#[instrument(skip(state, session, request), fields(lines = request.lines.len()))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<PlaceOrderResponse>> {
    let owner = resolve_owner(&session).await?;

    // Reconcile the untrusted snapshot into the server cart and confirm
    // the result is usable. Aborts map to retryable user-facing errors.
    let outcome = checkout::reconcile(state.cafe(), &owner, &request.lines).await?;

    // The server cart is now the source of truth for order creation.
    tracing::debug!(phase = %checkout::CheckoutPhase::OrderCreation, owner = %owner, "creating order");
    let order = state
        .cafe()
        .create_order(
            &owner,
            &CreateOrderRequest {
                payment_method: request.payment_method,
                notes: request.notes,
            },
        )
        .await?;

    tracing::info!(
        owner = %owner,
        order_id = %order.id,
        lines_placed = outcome.succeeded,
        lines_attempted = outcome.attempted,
        "order placed"
    );

    Ok(Json(PlaceOrderResponse {
        order_id: order.id,
        total_amount: order.total_amount,
        status: order.status,
        lines_placed: outcome.succeeded,
        lines_attempted: outcome.attempted,
    }))
}
