//! Wire types for the cafe API.
//!
//! The cafe API server is a document store fronted by JSON REST; these
//! structs mirror its response documents. Field names follow the API's
//! camelCase convention via serde renames.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::{CatalogItemId, OrderId, OrderStatus, PaymentStatus};

/// Drink modifiers carried on a cart line or order line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemModifiers {
    /// Free-text barista instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Selected cup size (e.g., "small", "large").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    /// Selected milk (e.g., "oat", "whole").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_milk: Option<String>,
    /// Cold foam topping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_cold_foam: Option<bool>,
}

impl ItemModifiers {
    /// Whether no modifier is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.special_instructions.is_none()
            && self.selected_size.is_none()
            && self.selected_milk.is_none()
            && self.add_cold_foam.is_none()
    }
}

/// A single line of a persisted server cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCartLine {
    /// Referenced catalog item.
    pub item: CatalogItemId,
    /// Denormalized display name at time of add.
    pub name: String,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Unit price at time of add.
    pub price: Decimal,
    /// Drink modifiers.
    #[serde(default)]
    pub modifiers: ItemModifiers,
}

/// The persisted cart document for one owner.
///
/// Exactly one of `user` / `guest_id` is populated; which one is the
/// store's concern, the storefront only ever addresses carts by
/// [`marigold_core::CartOwner`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCart {
    /// Document id of the cart.
    pub id: String,
    /// Owning user id, if authenticated.
    #[serde(default)]
    pub user: Option<String>,
    /// Owning guest session token, if anonymous.
    #[serde(default)]
    pub guest_id: Option<String>,
    /// Ordered cart lines.
    #[serde(default)]
    pub items: Vec<ServerCartLine>,
    /// Denormalized cart total.
    #[serde(default)]
    pub total_amount: Decimal,
}

impl ServerCart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// Input for the single-item add operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    /// Catalog item to add.
    pub item: CatalogItemId,
    /// Quantity to add.
    pub quantity: u32,
    /// Drink modifiers.
    #[serde(skip_serializing_if = "ItemModifiers::is_empty")]
    pub modifiers: ItemModifiers,
}

/// A menu item from the cafe catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Document id.
    pub id: CatalogItemId,
    /// Display name.
    pub name: String,
    /// Customer-facing description.
    #[serde(default)]
    pub description: Option<String>,
    /// Base price.
    pub price: Decimal,
    /// Menu category (e.g., "espresso", "pastries").
    #[serde(default)]
    pub category: Option<String>,
    /// Image URL, if any.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the item is currently orderable.
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// Request body for order creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Selected payment method identifier, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Order-level note to the baristas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A persisted order, as returned by the cafe API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document id of the order.
    pub id: OrderId,
    /// Order lines, copied from the consumed cart.
    #[serde(default)]
    pub items: Vec<ServerCartLine>,
    /// Order total.
    pub total_amount: Decimal,
    /// Preparation status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Payment status.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}
