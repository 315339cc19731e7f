//! Cart models: the client-held local snapshot and the JSON view shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::{CurrencyCode, DocId, Price};

use crate::cafe_api::{CartItemInput, ItemModifiers, ServerCart, ServerCartLine};

/// One line of the Local Cart Snapshot.
///
/// This is what the shopper's browser has been accumulating before
/// checkout. Nothing about it is trusted: `product_ref` is an arbitrary
/// string until validated, and the line has no identity beyond its
/// position in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCartLine {
    /// Claimed catalog item reference; valid iff 24 lowercase hex chars.
    pub product_ref: String,
    /// Human-readable label; must be non-empty for the line to be valid.
    pub display_name: String,
    /// Quantity, expected >= 1 (the store rejects anything else at add
    /// time).
    pub quantity: u32,
    /// Free-text barista instructions.
    #[serde(default)]
    pub special_instructions: Option<String>,
    /// Selected cup size.
    #[serde(default)]
    pub selected_size: Option<String>,
    /// Selected milk.
    #[serde(default)]
    pub selected_milk: Option<String>,
    /// Cold foam topping.
    #[serde(default)]
    pub add_cold_foam: Option<bool>,
}

impl LocalCartLine {
    /// Whether this line is eligible for server-side replay: well-formed
    /// product reference and a non-empty display name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        DocId::is_valid(&self.product_ref) && !self.display_name.is_empty()
    }

    /// Collect the modifier fields into the wire shape.
    #[must_use]
    pub fn modifiers(&self) -> ItemModifiers {
        ItemModifiers {
            special_instructions: self.special_instructions.clone(),
            selected_size: self.selected_size.clone(),
            selected_milk: self.selected_milk.clone(),
            add_cold_foam: self.add_cold_foam,
        }
    }

    /// Convert a validated line into the single-item add input.
    ///
    /// Returns `None` if `product_ref` is not a well-formed document id;
    /// callers are expected to have validated first.
    #[must_use]
    pub fn to_input(&self) -> Option<CartItemInput> {
        let item = marigold_core::CatalogItemId::parse(&self.product_ref).ok()?;
        Some(CartItemInput {
            item,
            quantity: self.quantity,
            modifiers: self.modifiers(),
        })
    }
}

// =============================================================================
// View types
// =============================================================================

/// Cart line shape returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    #[serde(skip_serializing_if = "ItemModifiers::is_empty")]
    pub modifiers: ItemModifiers,
}

/// Cart shape returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: format_price(Decimal::ZERO),
            item_count: 0,
        }
    }
}

/// The currency the cafe operates in. The cafe API sends bare decimal
/// amounts; the view layer attaches the currency for display.
const CURRENCY: CurrencyCode = CurrencyCode::USD;

/// Format a decimal amount as a price string in the operating currency.
fn format_price(amount: Decimal) -> String {
    Price::new(amount, CURRENCY).to_string()
}

impl From<&ServerCart> for CartView {
    fn from(cart: &ServerCart) -> Self {
        Self {
            items: cart.items.iter().map(CartLineView::from).collect(),
            subtotal: format_price(cart.total_amount),
            item_count: cart.total_quantity(),
        }
    }
}

impl From<&ServerCartLine> for CartLineView {
    fn from(line: &ServerCartLine) -> Self {
        Self {
            item_id: line.item.to_string(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: format_price(line.price),
            line_total: format_price(line.price * Decimal::from(line.quantity)),
            modifiers: line.modifiers.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use marigold_core::CatalogItemId;

    fn line(product_ref: &str, display_name: &str) -> LocalCartLine {
        LocalCartLine {
            product_ref: product_ref.to_string(),
            display_name: display_name.to_string(),
            quantity: 1,
            special_instructions: None,
            selected_size: None,
            selected_milk: None,
            add_cold_foam: None,
        }
    }

    const REF: &str = "5f2b8c9d1e3a4b5c6d7e8f90";

    #[test]
    fn validity_requires_hex_ref_and_name() {
        assert!(line(REF, "Latte").is_valid());
        assert!(!line("short", "Latte").is_valid());
        assert!(!line(REF, "").is_valid());
        assert!(!line(&REF.to_uppercase(), "Latte").is_valid());
    }

    #[test]
    fn to_input_carries_modifiers() {
        let mut l = line(REF, "Latte");
        l.selected_milk = Some("oat".to_string());
        l.add_cold_foam = Some(true);
        l.quantity = 3;

        let input = l.to_input().unwrap();
        assert_eq!(input.item, CatalogItemId::parse(REF).unwrap());
        assert_eq!(input.quantity, 3);
        assert_eq!(input.modifiers.selected_milk.as_deref(), Some("oat"));
        assert_eq!(input.modifiers.add_cold_foam, Some(true));
    }

    #[test]
    fn to_input_rejects_bad_ref() {
        assert!(line("not-hex", "Latte").to_input().is_none());
    }

    #[test]
    fn local_line_deserializes_from_client_shape() {
        let l: LocalCartLine = serde_json::from_value(serde_json::json!({
            "productRef": REF,
            "displayName": "Latte",
            "quantity": 2,
            "selectedSize": "large"
        }))
        .unwrap();
        assert_eq!(l.quantity, 2);
        assert_eq!(l.selected_size.as_deref(), Some("large"));
        assert!(l.add_cold_foam.is_none());
    }

    #[test]
    fn cart_view_from_server_cart() {
        let cart = ServerCart {
            id: "c1".to_string(),
            user: None,
            guest_id: Some("tok".to_string()),
            items: vec![ServerCartLine {
                item: CatalogItemId::parse(REF).unwrap(),
                name: "Latte".to_string(),
                quantity: 2,
                price: Decimal::new(450, 2),
                modifiers: ItemModifiers::default(),
            }],
            total_amount: Decimal::new(900, 2),
        };

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "$9.00");
        let first = view.items.first().unwrap();
        assert_eq!(first.unit_price, "$4.50");
        assert_eq!(first.line_total, "$9.00");
    }

    #[test]
    fn empty_cart_view() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, "$0.00");
        assert!(view.items.is_empty());
    }

    #[test]
    fn view_prices_match_operating_currency_rendering() {
        let amount = Decimal::new(1250, 2);
        assert_eq!(
            format_price(amount),
            Price::new(amount, CurrencyCode::USD).to_string()
        );
        assert_eq!(format_price(amount), "$12.50");
    }
}
