//! # Order Repository
//!
//! Orders, stored as one JSON array under `@app:pedidos`.
//!
//! There is no index: the list screen filters with
//! [`OrderFilter`](comanda_core::OrderFilter) over the loaded collection.

use tracing::{debug, error, info};

use comanda_core::order::{find_order, generate_order_id};
use comanda_core::validation::validate_order;
use comanda_core::{Order, OrderStatus};

use super::{read_json, write_json, ORDERS_KEY};
use crate::error::{DbError, DbResult};
use crate::kv::{KeyValueStore, SqliteStore};

/// Repository for orders.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.orders();
///
/// let order = repo.confirm(draft.build_now()?).await?;
/// repo.set_status(&order.id, OrderStatus::Done).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository<S = SqliteStore> {
    store: S,
}

impl<S: KeyValueStore> OrderRepository<S> {
    /// Creates a new OrderRepository.
    pub fn new(store: S) -> Self {
        OrderRepository { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Loads every order. A missing key is an empty list.
    pub async fn try_load(&self) -> DbResult<Vec<Order>> {
        let orders: Vec<Order> = read_json(&self.store, ORDERS_KEY)
            .await?
            .unwrap_or_default();

        debug!(count = orders.len(), "Loaded orders");
        Ok(orders)
    }

    /// Loads every order, in stored order. Empty on any failure.
    pub async fn load(&self) -> Vec<Order> {
        self.try_load().await.unwrap_or_else(|e| {
            error!(key = ORDERS_KEY, error = %e, "Failed to load orders");
            Vec::new()
        })
    }

    /// Replaces the whole collection.
    pub async fn try_save(&self, orders: &[Order]) -> DbResult<()> {
        write_json(&self.store, ORDERS_KEY, orders).await?;
        debug!(count = orders.len(), "Saved orders");
        Ok(())
    }

    /// Replaces the whole collection. Failures are logged, not reported.
    pub async fn save(&self, orders: &[Order]) {
        if let Err(e) = self.try_save(orders).await {
            error!(key = ORDERS_KEY, error = %e, "Failed to save orders");
        }
    }

    /// Finds an order by id.
    pub async fn get(&self, id: &str) -> Option<Order> {
        find_order(&self.load().await, id).ok().cloned()
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Removes the order with `id`. An unknown id is not an error.
    pub async fn try_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting order");

        let mut orders = self.try_load().await?;
        orders.retain(|o| o.id != id);
        self.try_save(&orders).await
    }

    /// Removes the order with `id`. Failures are logged.
    pub async fn delete(&self, id: &str) {
        if let Err(e) = self.try_delete(id).await {
            error!(id = %id, error = %e, "Failed to delete order");
        }
    }

    /// Replaces the stored order with the same id, in place.
    ///
    /// Returns false when no order has that id; nothing is added.
    pub async fn try_update(&self, order: &Order) -> DbResult<bool> {
        debug!(id = %order.id, "Updating order");

        let mut orders = self.try_load().await?;
        let replaced = match orders.iter_mut().find(|o| o.id == order.id) {
            Some(slot) => {
                *slot = order.clone();
                true
            }
            None => false,
        };
        self.try_save(&orders).await?;
        Ok(replaced)
    }

    /// Replaces the stored order with the same id. Failures are logged.
    pub async fn update(&self, order: &Order) {
        if let Err(e) = self.try_update(order).await {
            error!(id = %order.id, error = %e, "Failed to update order");
        }
    }

    /// Stores a confirmed order.
    ///
    /// ## Steps
    /// 1. Normalize (change only for cash, address only for delivery)
    /// 2. Validate (customer, at least one item, quantities ≥ 1)
    /// 3. Fresh UUID when `id` is empty
    /// 4. Drop any stored order with that id
    /// 5. Append
    ///
    /// Re-confirming an edited order therefore moves it to the end of the
    /// list.
    pub async fn confirm(&self, mut order: Order) -> DbResult<Order> {
        order.normalize();
        validate_order(&order)?;

        if order.id.is_empty() {
            order.id = generate_order_id();
        }

        let mut orders = self.try_load().await?;
        orders.retain(|o| o.id != order.id);
        orders.push(order.clone());
        self.try_save(&orders).await?;

        info!(
            id = %order.id,
            items = order.items.len(),
            total = %order.total(),
            "Order confirmed"
        );
        Ok(order)
    }

    /// Sets the status of a stored order. Any status may follow any other.
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> DbResult<Order> {
        let mut orders = self.try_load().await?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DbError::not_found("Order", id))?;
        order.set_status(status);
        let updated = order.clone();

        self.try_save(&orders).await?;

        info!(id = %id, status = %status, "Order status changed");
        Ok(updated)
    }

    // =========================================================================
    // Clearing
    // =========================================================================

    /// Removes the order collection only.
    pub async fn try_clear(&self) -> DbResult<()> {
        self.store.remove(ORDERS_KEY).await?;
        info!("Order storage cleared");
        Ok(())
    }

    /// Removes the order collection only. Failures are logged.
    pub async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            error!(error = %e, "Failed to clear order storage");
        }
    }

    /// Wipes the entire store, products included.
    pub async fn try_clear_all_storage(&self) -> DbResult<()> {
        self.store.clear().await?;
        info!("Entire store cleared");
        Ok(())
    }

    /// Wipes the entire store. Failures are logged.
    pub async fn clear_all_storage(&self) {
        if let Err(e) = self.try_clear_all_storage().await {
            error!(error = %e, "Failed to clear store");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::ProductRepository;
    use crate::repository::PRODUCTS_KEY;
    use chrono::NaiveTime;
    use comanda_core::{
        DeliveryAddress, FulfillmentMode, Money, OrderDraft, OrderFilter, OrderItem,
        PaymentMethod, Product, ValidationError,
    };

    fn product(code: &str, cents: i64) -> Product {
        Product {
            id: code.to_lowercase(),
            name: format!("Produto {}", code),
            code: code.to_string(),
            price: Money::from_cents(cents),
            ..Product::default()
        }
    }

    fn order(id: &str, customer: &str) -> Order {
        let mut draft = OrderDraft::new(customer);
        draft.id = Some(id.to_string());
        draft.items = vec![
            OrderItem::new(product("XB", 1000), 2),
            OrderItem::new(product("SL", 500), 1),
        ];
        draft
            .build(NaiveTime::from_hms_opt(12, 30, 0).unwrap())
            .unwrap()
    }

    fn repo() -> OrderRepository<MemoryStore> {
        OrderRepository::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_roundtrip() {
        let repo = repo();
        assert!(repo.load().await.is_empty());

        let orders = vec![order("o1", "Ana"), order("o2", "Bia")];
        repo.save(&orders).await;

        let loaded = repo.load().await;
        assert_eq!(loaded, orders);
        assert_eq!(loaded[0].total().to_string(), "25.00");
    }

    #[tokio::test]
    async fn test_confirm_new_order() {
        let repo = repo();
        let mut new_order = order("", "Ana");
        new_order.id.clear();

        let saved = repo.confirm(new_order).await.unwrap();
        assert!(!saved.id.is_empty());
        assert_eq!(saved.status, OrderStatus::InProgress);
        assert_eq!(repo.get(&saved.id).await, Some(saved));
    }

    #[tokio::test]
    async fn test_confirm_replaces_same_id() {
        let repo = repo();
        repo.save(&[order("o1", "Ana"), order("o2", "Bia")]).await;

        let mut edited = order("o1", "Ana Paula");
        edited.items.truncate(1);
        repo.confirm(edited).await.unwrap();

        let stored = repo.load().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].id, "o1");
        assert_eq!(stored[1].customer, "Ana Paula");
        assert_eq!(stored[1].total().cents(), 2000);
    }

    #[tokio::test]
    async fn test_confirm_rejects_invalid() {
        let repo = repo();
        let mut empty = order("o1", "Ana");
        empty.items.clear();

        assert!(matches!(
            repo.confirm(empty).await,
            Err(DbError::Validation(ValidationError::EmptyOrder))
        ));
        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_drops_inapplicable_fields() {
        let repo = repo();
        let mut pix = order("o1", "Ana");
        pix.payment_method = PaymentMethod::Pix;
        pix.change_for = Some(Money::from_cents(5000));
        pix.fulfillment = FulfillmentMode::DineIn;
        pix.delivery_address = Some(DeliveryAddress {
            street: "Rua A".into(),
            ..DeliveryAddress::default()
        });

        let saved = repo.confirm(pix).await.unwrap();
        assert_eq!(saved.change_for, None);
        assert_eq!(saved.delivery_address, None);

        let stored = repo.store().get(ORDERS_KEY).await.unwrap().unwrap();
        assert!(!stored.contains("valorTroco"));
        assert!(!stored.contains("enderecoEntrega"));
        assert_eq!(repo.get("o1").await, Some(saved));
    }

    #[tokio::test]
    async fn test_set_status_any_transition() {
        let repo = repo();
        repo.save(&[order("o1", "Ana")]).await;

        for status in [
            OrderStatus::Canceled,
            OrderStatus::InProgress,
            OrderStatus::Done,
            OrderStatus::Done,
        ] {
            let updated = repo.set_status("o1", status).await.unwrap();
            assert_eq!(updated.status, status);
            assert_eq!(repo.get("o1").await.unwrap().status, status);
        }

        assert!(matches!(
            repo.set_status("missing", OrderStatus::Done).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo();
        repo.save(&[order("o1", "Ana"), order("o2", "Bia")]).await;

        let mut edited = order("o2", "Bia");
        edited.payment_method = PaymentMethod::Cash;
        edited.change_for = Some(Money::from_cents(3000));
        repo.update(&edited).await;

        let stored = repo.get("o2").await.unwrap();
        assert_eq!(stored.change_due(), Some(Money::from_cents(500)));

        repo.delete("o1").await;
        let stored = repo.load().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "o2");
    }

    #[tokio::test]
    async fn test_filter_loaded_orders() {
        let repo = repo();
        repo.save(&[order("o1", "Ana"), order("o2", "Bia")]).await;
        repo.set_status("o2", OrderStatus::Done).await.unwrap();

        let orders = repo.load().await;
        let done = OrderFilter::default().with_status(OrderStatus::Done);
        assert_eq!(done.apply(&orders).len(), 1);
        assert_eq!(OrderFilter::search("ana").apply(&orders)[0].id, "o1");
    }

    #[tokio::test]
    async fn test_clear_and_clear_all() {
        let store = MemoryStore::new();
        let orders = OrderRepository::new(store.clone());
        let products = ProductRepository::new(store.clone());

        products.save(&[product("XB", 1000)]).await;
        orders.save(&[order("o1", "Ana")]).await;

        orders.clear().await;
        assert!(orders.load().await.is_empty());
        assert!(store.get(PRODUCTS_KEY).await.unwrap().is_some());

        orders.save(&[order("o1", "Ana")]).await;
        orders.clear_all_storage().await;
        assert!(orders.load().await.is_empty());
        assert!(products.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_orders_degrade_to_empty() {
        let store = MemoryStore::with_entries([(ORDERS_KEY, "[{\"id\": 1}]")]);
        let repo = OrderRepository::new(store);

        assert!(repo.load().await.is_empty());
        assert!(matches!(
            repo.try_load().await,
            Err(DbError::Serialization { .. })
        ));
        assert!(repo.confirm(order("o1", "Ana")).await.is_err());
    }

    #[tokio::test]
    async fn test_write_failures_are_logged_not_raised() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();
        db.close().await;

        let orders = [order("o1", "Ana")];

        repo.save(&orders).await;
        repo.delete("o1").await;
        repo.update(&orders[0]).await;
        repo.clear().await;
        repo.clear_all_storage().await;
        assert!(repo.load().await.is_empty());

        assert!(matches!(
            repo.try_save(&orders).await,
            Err(DbError::ConnectionFailed(_))
        ));
        assert!(matches!(
            repo.try_delete("o1").await,
            Err(DbError::ConnectionFailed(_))
        ));
        assert!(matches!(
            repo.try_clear().await,
            Err(DbError::ConnectionFailed(_))
        ));
        assert!(matches!(
            repo.confirm(orders[0].clone()).await,
            Err(DbError::ConnectionFailed(_))
        ));
    }
}
