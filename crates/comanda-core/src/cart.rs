//! # Sacola
//!
//! The in-progress cart a customer fills from the menu before checkout.
//!
//! ## Sacola Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sacola Operations                                    │
//! │                                                                         │
//! │  Menu Action              Method                 Sacola Change          │
//! │  ───────────              ──────                 ─────────────          │
//! │                                                                         │
//! │  Add product ────────────► add() ──────────────► push, or qty += n     │
//! │                                                  if already present     │
//! │                                                                         │
//! │  Tap remove ─────────────► remove_one() ───────► qty -= 1, or remove   │
//! │                                                  when qty was 1         │
//! │                                                                         │
//! │  Checkout ───────────────► into_draft() ───────► OrderDraft            │
//! │                                                                         │
//! │  Menu refocused ─────────► clear() ────────────► items.clear()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::order::{items_total, remove_one, OrderDraft};
use crate::types::{OrderItem, Product};
use crate::validation::validate_quantity;

/// The customer's cart.
///
/// ## Invariants
/// - Items are unique by product `id` (adding the same product increases quantity)
/// - Quantity is at least 1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sacola {
    items: Vec<OrderItem>,
}

impl Sacola {
    /// Creates an empty sacola.
    pub fn new() -> Self {
        Sacola::default()
    }

    /// Adds a product or increases its quantity if already present.
    pub fn add(&mut self, product: &Product, quantity: u32) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return Ok(());
        }

        self.items.push(OrderItem::new(product.clone(), quantity));
        Ok(())
    }

    /// Removes one unit of the item at `index`.
    pub fn remove_one(&mut self, index: usize) -> CoreResult<()> {
        remove_one(&mut self.items, index)
    }

    /// Empties the sacola.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The items, in the order they were first added.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Σ price × quantity.
    pub fn total(&self) -> Money {
        items_total(&self.items)
    }

    /// Checks if the sacola is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Starts checkout: a draft for `customer` holding these items.
    pub fn into_draft(self, customer: impl Into<String>) -> OrderDraft {
        OrderDraft {
            items: self.items,
            ..OrderDraft::new(customer)
        }
    }
}

/// Sacola summary for the checkout footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SacolaTotals {
    pub item_count: usize,
    pub total_quantity: u32,
    pub total: Money,
}

impl From<&Sacola> for SacolaTotals {
    fn from(sacola: &Sacola) -> Self {
        SacolaTotals {
            item_count: sacola.item_count(),
            total_quantity: sacola.total_quantity(),
            total: sacola.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderStatus;
    use chrono::NaiveTime;

    fn test_product(id: &str, cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {}", id),
            code: format!("COD-{}", id),
            price: Money::from_cents(cents),
            ..Product::default()
        }
    }

    #[test]
    fn test_add_item() {
        let mut sacola = Sacola::new();
        sacola.add(&test_product("1", 999), 2).unwrap();

        assert_eq!(sacola.item_count(), 1);
        assert_eq!(sacola.total_quantity(), 2);
        assert_eq!(sacola.total().cents(), 1998);
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut sacola = Sacola::new();
        let product = test_product("1", 999);

        sacola.add(&product, 2).unwrap();
        sacola.add(&product, 3).unwrap();

        assert_eq!(sacola.item_count(), 1);
        assert_eq!(sacola.total_quantity(), 5);
    }

    #[test]
    fn test_add_saturates_quantity() {
        let mut sacola = Sacola::new();
        let product = test_product("1", 999);

        sacola.add(&product, u32::MAX).unwrap();
        sacola.add(&product, 5).unwrap();
        sacola.add(&test_product("2", 500), 1).unwrap();

        assert_eq!(sacola.items()[0].quantity, u32::MAX);
        assert_eq!(sacola.total_quantity(), u32::MAX);
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let mut sacola = Sacola::new();
        assert!(sacola.add(&test_product("1", 999), 0).is_err());
        assert!(sacola.is_empty());
    }

    #[test]
    fn test_remove_one() {
        let mut sacola = Sacola::new();
        sacola.add(&test_product("1", 1000), 2).unwrap();
        sacola.add(&test_product("2", 500), 1).unwrap();

        sacola.remove_one(0).unwrap();
        assert_eq!(sacola.items()[0].quantity, 1);

        sacola.remove_one(1).unwrap();
        assert_eq!(sacola.item_count(), 1);

        sacola.remove_one(0).unwrap();
        assert!(sacola.is_empty());
        assert!(sacola.remove_one(0).is_err());
    }

    #[test]
    fn test_totals_summary() {
        let mut sacola = Sacola::new();
        sacola.add(&test_product("1", 1000), 2).unwrap();
        sacola.add(&test_product("2", 500), 1).unwrap();

        let totals = SacolaTotals::from(&sacola);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total.to_string(), "25.00");
    }

    #[test]
    fn test_checkout() {
        let mut sacola = Sacola::new();
        sacola.add(&test_product("1", 1000), 1).unwrap();

        let order = sacola
            .into_draft("Carla")
            .build(NaiveTime::from_hms_opt(19, 45, 0).unwrap())
            .unwrap();

        assert_eq!(order.customer, "Carla");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.placed_at, "19:45");
    }

    #[test]
    fn test_clear() {
        let mut sacola = Sacola::new();
        sacola.add(&test_product("1", 999), 2).unwrap();
        sacola.clear();
        assert!(sacola.is_empty());
    }
}
