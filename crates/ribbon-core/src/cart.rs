//! # Cart Store
//!
//! The shopping cart as a plain value plus a reducer.
//!
//! ## Reducer Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   CartState ──┐                                                         │
//! │               ├──► reduce() ──► CartState'  ──► total() / item_count()  │
//! │   CartAction ─┘                                                         │
//! │                                                                         │
//! │   AddItem(item)          merge by SKU, else append (insertion order)    │
//! │   RemoveItem(sku)        delete line, no-op if absent                   │
//! │   UpdateQuantity{..}     quantity = max(0, q), zero lines are kept      │
//! │   ToggleCart             flip drawer visibility                         │
//! │   ClearCart              drop every line                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per SKU.
//! - Every line quantity is ≥ 0.
//!
//! Stock is not checked here. The server re-checks availability when an
//! order is placed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Line Item
// =============================================================================

/// One product in the cart, keyed by SKU.
///
/// Product fields are snapshotted when the line is created so the cart
/// renders without another catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    pub sku: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub is_wired: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl CartLineItem {
    /// Creates a bare line item with no display attributes.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price_cents: i64,
        quantity: i64,
    ) -> Self {
        CartLineItem {
            sku: sku.into(),
            name: name.into(),
            unit_price: Money::from_cents(unit_price_cents),
            quantity,
            image_url: None,
            category: None,
            width: None,
            length: None,
            is_wired: false,
            color: None,
            brand: None,
        }
    }

    /// Snapshots a catalog product into a cart line.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLineItem {
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.price(),
            quantity,
            image_url: product.image_url.clone(),
            category: Some(product.category.clone()),
            width: product.width.clone(),
            length: product.length.clone(),
            is_wired: product.is_wired,
            color: product.color.clone(),
            brand: product.brand.clone(),
        }
    }

    /// unit_price × quantity
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart State & Actions
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    /// Lines in insertion order.
    pub items: Vec<CartLineItem>,
    /// Cart drawer visibility. UI only.
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    AddItem(CartLineItem),
    RemoveItem(String),
    UpdateQuantity { sku: String, quantity: i64 },
    ToggleCart,
    ClearCart,
}

/// Applies `action` to `state`, returning the next state.
pub fn reduce(mut state: CartState, action: CartAction) -> CartState {
    state.dispatch(action);
    state
}

impl CartState {
    /// In-place form of [`reduce`].
    pub fn dispatch(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem(item) => {
                let quantity = item.quantity.max(0);
                match self.items.iter_mut().find(|line| line.sku == item.sku) {
                    Some(line) => {
                        line.quantity = line.quantity.saturating_add(quantity);
                    }
                    None => self.items.push(CartLineItem { quantity, ..item }),
                }
            }
            CartAction::RemoveItem(sku) => {
                self.items.retain(|line| line.sku != sku);
            }
            CartAction::UpdateQuantity { sku, quantity } => {
                if let Some(line) = self.items.iter_mut().find(|line| line.sku == sku) {
                    line.quantity = quantity.max(0);
                }
            }
            CartAction::ToggleCart => {
                self.is_open = !self.is_open;
            }
            CartAction::ClearCart => {
                self.items.clear();
            }
        }
    }

    /// Σ unit_price × quantity
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Σ quantity (what the cart badge shows).
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Number of distinct SKUs, including zero-quantity lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, sku: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.sku == sku)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn add(state: CartState, sku: &str, price: i64, qty: i64) -> CartState {
        reduce(
            state,
            CartAction::AddItem(CartLineItem::new(sku, format!("Ribbon {sku}"), price, qty)),
        )
    }

    #[test]
    fn test_same_sku_merges_quantity() {
        let state = add(CartState::default(), "R1", 500, 2);
        let state = add(state, "R1", 500, 3);

        assert_eq!(state.line_count(), 1);
        assert_eq!(state.items[0].quantity, 5);
        assert_eq!(state.total(), Money::from_cents(2500));
        assert_eq!(state.total().to_string(), "$25.00");
    }

    #[test]
    fn test_distinct_skus_keep_insertion_order() {
        let state = add(CartState::default(), "B", 100, 1);
        let state = add(state, "A", 200, 1);
        let state = add(state, "C", 300, 1);
        let state = add(state, "A", 200, 4);

        let skus: Vec<&str> = state.items.iter().map(|l| l.sku.as_str()).collect();
        assert_eq!(skus, vec!["B", "A", "C"]);
        assert_eq!(state.item_count(), 7);
    }

    #[test]
    fn test_update_quantity_to_zero_keeps_line() {
        let state = add(CartState::default(), "R1", 500, 2);
        let state = reduce(
            state,
            CartAction::UpdateQuantity {
                sku: "R1".to_string(),
                quantity: 0,
            },
        );

        assert_eq!(state.line_count(), 1);
        assert_eq!(state.get("R1").map(|l| l.quantity), Some(0));
        assert_eq!(state.total(), Money::zero());
    }

    #[test]
    fn test_update_quantity_clamps_negative() {
        let state = add(CartState::default(), "R1", 500, 2);
        let state = reduce(
            state,
            CartAction::UpdateQuantity {
                sku: "R1".to_string(),
                quantity: -4,
            },
        );
        assert_eq!(state.items[0].quantity, 0);
    }

    #[test]
    fn test_update_quantity_unknown_sku_is_noop() {
        let before = add(CartState::default(), "R1", 500, 2);
        let after = reduce(
            before.clone(),
            CartAction::UpdateQuantity {
                sku: "NOPE".to_string(),
                quantity: 9,
            },
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_unknown_sku_is_noop() {
        let before = add(CartState::default(), "R1", 500, 2);
        let after = reduce(before.clone(), CartAction::RemoveItem("R2".to_string()));
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_item() {
        let state = add(CartState::default(), "R1", 500, 2);
        let state = add(state, "R2", 100, 1);
        let state = reduce(state, CartAction::RemoveItem("R1".to_string()));

        assert_eq!(state.line_count(), 1);
        assert!(state.get("R1").is_none());
    }

    #[test]
    fn test_toggle_twice_restores_visibility() {
        let state = CartState::default();
        let once = reduce(state.clone(), CartAction::ToggleCart);
        assert!(once.is_open);
        let twice = reduce(once, CartAction::ToggleCart);
        assert_eq!(twice.is_open, state.is_open);
    }

    #[test]
    fn test_clear_cart_keeps_drawer_flag() {
        let state = add(CartState::default(), "R1", 500, 2);
        let state = reduce(state, CartAction::ToggleCart);
        let state = reduce(state, CartAction::ClearCart);

        assert!(state.is_empty());
        assert!(state.is_open);
    }

    #[test]
    fn test_negative_add_is_clamped() {
        let state = add(CartState::default(), "R1", 500, 2);
        let state = add(state, "R1", 500, -10);
        assert_eq!(state.items[0].quantity, 2);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let state = add(CartState::default(), "R1", 500, 2);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["isOpen"], false);
        assert_eq!(json["items"][0]["unitPrice"], 500);
        assert_eq!(json["items"][0]["isWired"], false);
    }

    proptest! {
        #[test]
        fn prop_distinct_skus(lines in proptest::collection::btree_map("[A-Z]{1,4}", (0i64..100_000, 1i64..50), 0..20)) {
            let mut state = CartState::default();
            for (sku, (price, qty)) in &lines {
                state.dispatch(CartAction::AddItem(CartLineItem::new(sku.clone(), "x", *price, *qty)));
            }

            let expected: i64 = lines.values().map(|(p, q)| p * q).sum();
            prop_assert_eq!(state.line_count(), lines.len());
            prop_assert_eq!(state.total().cents(), expected);
        }

        #[test]
        fn prop_repeated_adds_merge(q1 in 0i64..10_000, q2 in 0i64..10_000) {
            let state = add(CartState::default(), "R1", 250, q1);
            let state = add(state, "R1", 250, q2);
            prop_assert_eq!(state.line_count(), 1);
            prop_assert_eq!(state.items[0].quantity, q1 + q2);
        }
    }
}
