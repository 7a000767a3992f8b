//! # Order Logic
//!
//! Totals, change due, status changes and line item edits.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. DRAFT                                                              │
//! │     └── OrderDraft::new("Ana") → add_item() → add_item()               │
//! │                                                                         │
//! │  2. BUILD                                                              │
//! │     └── draft.build(now) → Order { status: Em Andamento }              │
//! │         (valorTroco kept only for dinheiro,                            │
//! │          enderecoEntrega kept only for entrega)                        │
//! │                                                                         │
//! │  3. TRACK                                                              │
//! │     └── set_status(Finalizado | Cancelado | Em Andamento)              │
//! │         any → any, no terminal state                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveTime, Timelike};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    DeliveryAddress, FulfillmentMode, Order, OrderItem, OrderStatus, PaymentMethod, Product,
};
use crate::validation::{validate_order, validate_quantity};

// =============================================================================
// Shared Calculations
// =============================================================================

/// Σ price × quantity over the items.
///
/// ## Example
/// ```rust
/// use comanda_core::money::Money;
/// use comanda_core::order::items_total;
/// use comanda_core::types::{OrderItem, Product};
///
/// let burger = Product { price: Money::from_cents(1000), ..Product::default() };
/// let juice = Product { price: Money::from_cents(500), ..Product::default() };
/// let items = vec![OrderItem::new(burger, 2), OrderItem::new(juice, 1)];
///
/// assert_eq!(items_total(&items).to_string(), "25.00");
/// ```
pub fn items_total(items: &[OrderItem]) -> Money {
    items.iter().map(OrderItem::line_total).sum()
}

/// Change to hand back for a cash payment.
///
/// Returns `None` when the tender does not exceed the total. An
/// under-tendered amount is not an error.
///
/// ## Example
/// ```rust
/// use comanda_core::money::Money;
/// use comanda_core::order::change_due;
///
/// let total = Money::from_cents(2500);
/// assert_eq!(change_due(Money::from_cents(3000), total), Some(Money::from_cents(500)));
/// assert_eq!(change_due(Money::from_cents(2500), total), None);
/// assert_eq!(change_due(Money::from_cents(2000), total), None);
/// ```
pub fn change_due(tendered: Money, total: Money) -> Option<Money> {
    let change = tendered - total;
    change.is_positive().then_some(change)
}

/// Removes one unit of the item at `index`.
///
/// An item with quantity 1 is removed from the list; otherwise its quantity
/// drops by one and the entry stays.
pub fn remove_one(items: &mut Vec<OrderItem>, index: usize) -> CoreResult<()> {
    let len = items.len();
    let item = items
        .get_mut(index)
        .ok_or(CoreError::ItemIndexOutOfRange { index, len })?;

    if item.quantity > 1 {
        item.quantity -= 1;
    } else {
        items.remove(index);
    }

    Ok(())
}

/// Formats an order time as `HH:MM`.
pub fn format_order_time(time: impl Timelike) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Generates a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Looks an order up by id.
pub fn find_order<'a>(orders: &'a [Order], id: &str) -> CoreResult<&'a Order> {
    orders
        .iter()
        .find(|o| o.id == id)
        .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
}

// =============================================================================
// Order
// =============================================================================

impl Order {
    /// Order total, recomputed from the items every time.
    pub fn total(&self) -> Money {
        items_total(&self.items)
    }

    /// Change due, only for cash payments with a tender above the total.
    pub fn change_due(&self) -> Option<Money> {
        if self.payment_method != PaymentMethod::Cash {
            return None;
        }
        change_due(self.change_for?, self.total())
    }

    /// Sets the status to the given literal, whatever the current one is.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Removes one unit of the item at `index`.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<()> {
        remove_one(&mut self.items, index)
    }

    /// Total number of units across all items.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Returns true for delivery orders.
    pub fn is_delivery(&self) -> bool {
        self.fulfillment == FulfillmentMode::Delivery
    }

    /// Drops the fields that do not apply to the chosen options.
    ///
    /// `change_for` is kept only for cash payments. `delivery_address` is
    /// kept only for delivery, where a missing one becomes an empty address.
    pub fn normalize(&mut self) {
        if self.payment_method != PaymentMethod::Cash {
            self.change_for = None;
        }
        if self.is_delivery() {
            self.delivery_address.get_or_insert_with(DeliveryAddress::default);
        } else {
            self.delivery_address = None;
        }
    }

    /// Case-insensitive match on the customer name or any item's product name.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.customer.to_lowercase().contains(&query)
            || self
                .items
                .iter()
                .any(|i| i.product.name.to_lowercase().contains(&query))
    }
}

// =============================================================================
// Order Filter
// =============================================================================

/// Filter for the order list: search text plus an optional status.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Matched against customer and item names. Empty matches everything.
    pub search: String,
    /// Exact status, or `None` for all.
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Filter by search text only.
    pub fn search(text: impl Into<String>) -> Self {
        OrderFilter {
            search: text.into(),
            status: None,
        }
    }

    /// Adds a status constraint.
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the order passes the filter.
    pub fn matches(&self, order: &Order) -> bool {
        order.matches_search(&self.search) && self.status.map_or(true, |s| order.status == s)
    }

    /// Applies the filter, keeping list order.
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// An order being filled in, before confirmation.
///
/// ## Usage
/// ```rust
/// use chrono::NaiveTime;
/// use comanda_core::money::Money;
/// use comanda_core::order::OrderDraft;
/// use comanda_core::types::{PaymentMethod, Product};
///
/// let burger = Product { id: "p1".into(), name: "X-Burger".into(), price: Money::from_cents(1000), ..Product::default() };
///
/// let mut draft = OrderDraft::new("Ana");
/// draft.add_item(burger, 2, None).unwrap();
/// draft.payment_method = PaymentMethod::Cash;
/// draft.change_for = Some(Money::from_cents(3000));
///
/// let order = draft.build(NaiveTime::from_hms_opt(12, 5, 0).unwrap()).unwrap();
/// assert_eq!(order.placed_at, "12:05");
/// assert_eq!(order.change_due(), Some(Money::from_cents(1000)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    /// Set when editing an existing order.
    pub id: Option<String>,
    pub customer: String,
    pub items: Vec<OrderItem>,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub change_for: Option<Money>,
    pub fulfillment: FulfillmentMode,
    pub delivery_address: Option<DeliveryAddress>,
}

impl OrderDraft {
    /// Starts a draft for a customer.
    pub fn new(customer: impl Into<String>) -> Self {
        OrderDraft {
            customer: customer.into(),
            ..OrderDraft::default()
        }
    }

    /// Reopens a stored order for editing. The id is kept.
    pub fn from_order(order: &Order) -> Self {
        OrderDraft {
            id: Some(order.id.clone()),
            customer: order.customer.clone(),
            items: order.items.clone(),
            note: order.note.clone(),
            payment_method: order.payment_method,
            change_for: order.change_for,
            fulfillment: order.fulfillment,
            delivery_address: order.delivery_address.clone(),
        }
    }

    /// Appends a line item.
    pub fn add_item(
        &mut self,
        product: Product,
        quantity: u32,
        note: Option<String>,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;
        self.items.push(OrderItem {
            product,
            quantity,
            note: note.filter(|n| !n.trim().is_empty()),
        });
        Ok(())
    }

    /// Removes one unit of the item at `index`.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<()> {
        remove_one(&mut self.items, index)
    }

    /// Running total.
    pub fn total(&self) -> Money {
        items_total(&self.items)
    }

    /// Running change due (cash only).
    pub fn change_due(&self) -> Option<Money> {
        if self.payment_method != PaymentMethod::Cash {
            return None;
        }
        change_due(self.change_for?, self.total())
    }

    /// Validates and produces the order, stamped with `now` as `HH:MM`.
    ///
    /// The status is always reset to "Em Andamento". `change_for` is
    /// dropped unless paying in cash and `delivery_address` unless
    /// delivering.
    pub fn build(self, now: NaiveTime) -> Result<Order, ValidationError> {
        let mut order = Order {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generate_order_id),
            customer: self.customer,
            items: self.items,
            status: OrderStatus::InProgress,
            placed_at: format_order_time(now),
            note: self.note.filter(|n| !n.trim().is_empty()),
            payment_method: self.payment_method,
            change_for: self.change_for,
            fulfillment: self.fulfillment,
            delivery_address: self.delivery_address,
        };
        order.normalize();

        validate_order(&order)?;
        Ok(order)
    }

    /// Builds the order with the current local time.
    pub fn build_now(self) -> Result<Order, ValidationError> {
        self.build(Local::now().time())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            code: id.to_uppercase(),
            price: Money::from_cents(cents),
            ..Product::default()
        }
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn sample_order() -> Order {
        let mut draft = OrderDraft::new("Ana");
        draft.add_item(product("p1", "X-Burger", 1000), 2, None).unwrap();
        draft.add_item(product("p2", "Suco", 500), 1, Some("sem gelo".into())).unwrap();
        draft.build(noon()).unwrap()
    }

    #[test]
    fn test_total() {
        let order = sample_order();
        assert_eq!(order.total().cents(), 2500);
        assert_eq!(order.total().to_string(), "25.00");
        assert_eq!(order.total_quantity(), 3);
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let mut order = sample_order();
        let loose: Product = serde_json::from_value(serde_json::json!({
            "nome": "Avulso", "codigo": "Avulso"
        }))
        .unwrap();
        order.items.push(OrderItem::new(loose, 3));
        assert_eq!(order.total().cents(), 2500);
    }

    #[test]
    fn test_huge_price_saturates_total() {
        let corrupt: Product = serde_json::from_value(serde_json::json!({
            "id": "p9", "nome": "Corrompido", "preco": 1e17
        }))
        .unwrap();
        let items = vec![OrderItem::new(corrupt.clone(), 2), OrderItem::new(corrupt, 1)];

        assert_eq!(items_total(&items).cents(), i64::MAX);

        let mut order = sample_order();
        order.items.extend(items);
        order.items[0].quantity = u32::MAX;
        assert_eq!(order.total().cents(), i64::MAX);
        assert_eq!(order.total_quantity(), u32::MAX);
    }

    #[test]
    fn test_normalize_drops_stray_fields() {
        let mut order = sample_order();
        order.payment_method = PaymentMethod::Pix;
        order.change_for = Some(Money::from_cents(5000));
        order.fulfillment = FulfillmentMode::DineIn;
        order.delivery_address = Some(DeliveryAddress::default());

        order.normalize();
        assert_eq!(order.change_for, None);
        assert_eq!(order.delivery_address, None);

        order.payment_method = PaymentMethod::Cash;
        order.change_for = Some(Money::from_cents(5000));
        order.fulfillment = FulfillmentMode::Delivery;

        order.normalize();
        assert_eq!(order.change_for, Some(Money::from_cents(5000)));
        assert_eq!(order.delivery_address, Some(DeliveryAddress::default()));
    }

    #[test]
    fn test_change_due() {
        let mut order = sample_order();
        order.payment_method = PaymentMethod::Cash;

        order.change_for = Some(Money::from_cents(3000));
        assert_eq!(order.change_due().map(|m| m.to_string()), Some("5.00".into()));

        order.change_for = Some(Money::from_cents(2000));
        assert_eq!(order.change_due(), None);

        order.change_for = Some(Money::from_cents(2500));
        assert_eq!(order.change_due(), None);

        order.change_for = None;
        assert_eq!(order.change_due(), None);

        order.change_for = Some(Money::from_cents(3000));
        order.payment_method = PaymentMethod::Pix;
        assert_eq!(order.change_due(), None);
    }

    #[test]
    fn test_remove_item() {
        let mut order = sample_order();

        // X-Burger has quantity 2: decremented, kept
        order.remove_item(0).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity, 1);

        // Suco has quantity 1: removed
        order.remove_item(1).unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product.name, "X-Burger");

        assert!(matches!(
            order.remove_item(5),
            Err(CoreError::ItemIndexOutOfRange { index: 5, len: 1 })
        ));
    }

    #[test]
    fn test_find_order() {
        let order = sample_order();
        let orders = vec![order.clone()];
        assert_eq!(find_order(&orders, &order.id).unwrap(), &order);
        assert!(matches!(
            find_order(&orders, "missing"),
            Err(CoreError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_status_transitions() {
        let mut order = sample_order();
        assert_eq!(order.status, OrderStatus::InProgress);

        order.set_status(OrderStatus::Canceled);
        assert_eq!(order.status, OrderStatus::Canceled);

        // No terminal state
        order.set_status(OrderStatus::InProgress);
        assert_eq!(order.status, OrderStatus::InProgress);

        order.set_status(OrderStatus::Done);
        order.set_status(OrderStatus::Done);
        assert_eq!(order.status, OrderStatus::Done);
    }

    #[test]
    fn test_build_drops_conditional_fields() {
        let mut draft = OrderDraft::new("Ana");
        draft.add_item(product("p1", "X-Burger", 1000), 1, None).unwrap();
        draft.payment_method = PaymentMethod::Card;
        draft.change_for = Some(Money::from_cents(5000));
        draft.fulfillment = FulfillmentMode::Pickup;
        draft.delivery_address = Some(DeliveryAddress {
            street: "Rua A".into(),
            ..DeliveryAddress::default()
        });

        let order = draft.build(noon()).unwrap();
        assert_eq!(order.change_for, None);
        assert_eq!(order.delivery_address, None);
    }

    #[test]
    fn test_build_keeps_delivery_address() {
        let mut draft = OrderDraft::new("Ana");
        draft.add_item(product("p1", "X-Burger", 1000), 1, None).unwrap();
        draft.fulfillment = FulfillmentMode::Delivery;

        let order = draft.build(noon()).unwrap();
        assert!(order.is_delivery());
        assert_eq!(order.delivery_address, Some(DeliveryAddress::default()));
    }

    #[test]
    fn test_build_validation() {
        let empty = OrderDraft::new("Ana");
        assert_eq!(empty.build(noon()), Err(ValidationError::EmptyOrder));

        let mut nameless = OrderDraft::new("  ");
        nameless.add_item(product("p1", "X-Burger", 1000), 1, None).unwrap();
        assert_eq!(
            nameless.build(noon()),
            Err(ValidationError::required("cliente"))
        );

        let mut draft = OrderDraft::new("Ana");
        assert!(draft.add_item(product("p1", "X-Burger", 1000), 0, None).is_err());
    }

    #[test]
    fn test_edit_keeps_id_and_resets_status() {
        let mut order = sample_order();
        order.set_status(OrderStatus::Done);

        let draft = OrderDraft::from_order(&order);
        let rebuilt = draft.build(NaiveTime::from_hms_opt(8, 7, 0).unwrap()).unwrap();

        assert_eq!(rebuilt.id, order.id);
        assert_eq!(rebuilt.status, OrderStatus::InProgress);
        assert_eq!(rebuilt.placed_at, "08:07");
    }

    #[test]
    fn test_filter() {
        let ana = sample_order();
        let mut bia = sample_order();
        bia.customer = "Bia".into();
        bia.items.truncate(1);
        bia.set_status(OrderStatus::Done);
        let orders = vec![ana, bia];

        assert_eq!(OrderFilter::default().apply(&orders).len(), 2);
        assert_eq!(OrderFilter::search("bia").apply(&orders).len(), 1);
        // Item name match
        assert_eq!(OrderFilter::search("SUCO").apply(&orders)[0].customer, "Ana");
        assert_eq!(
            OrderFilter::search("")
                .with_status(OrderStatus::Done)
                .apply(&orders)[0]
                .customer,
            "Bia"
        );
        assert!(OrderFilter::search("ana")
            .with_status(OrderStatus::Canceled)
            .apply(&orders)
            .is_empty());
    }
}
