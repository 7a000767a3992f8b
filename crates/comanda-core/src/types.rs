//! # Domain Types
//!
//! Records persisted by Comanda and shared with the mobile frontend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  product (copy) │       │
//! │  │  code (unique)  │   │  customer       │   │  quantity ≥ 1   │       │
//! │  │  name, price    │   │  items, status  │   │  note           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderStatus    │   │ PaymentMethod   │   │ FulfillmentMode │       │
//! │  │  Em Andamento   │   │  pix            │   │  loja           │       │
//! │  │  Finalizado     │   │  cartao         │   │  retirada       │       │
//! │  │  Cancelado      │   │  dinheiro       │   │  entrega        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Rust fields are English; the JSON keys stay the Portuguese names already
//! stored on devices (`nome`, `codigo`, `preco`, `itens`, ...).
//!
//! ## Snapshot Pattern
//! An `OrderItem` embeds the whole `Product` by value. Editing the catalog
//! later never changes past orders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::UNCATEGORIZED;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4). Empty until first saved.
    #[serde(default)]
    pub id: String,

    /// Display name.
    #[serde(rename = "nome")]
    #[serde(default)]
    pub name: String,

    /// Business code, unique across the catalog.
    #[serde(rename = "codigo")]
    #[serde(default)]
    pub code: String,

    /// Unit price.
    #[serde(rename = "preco")]
    #[serde(default)]
    #[ts(type = "number")]
    pub price: Money,

    /// Grouping label. `None` or empty means "Sem Categoria".
    #[serde(rename = "categoria")]
    #[serde(default)]
    pub category: Option<String>,

    /// Free-text note.
    #[serde(rename = "observacao")]
    #[serde(default)]
    pub note: Option<String>,

    /// Image URI.
    #[serde(rename = "imagem")]
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Returns the category label, with the "Sem Categoria" sentinel for
    /// missing or empty categories.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }

    /// Name shown on order tickets: the name, or the code when the name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Any state may move to any other by direct user action; there is no
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderStatus {
    /// Being prepared.
    #[default]
    #[serde(rename = "Em Andamento")]
    InProgress,
    /// Delivered to the customer.
    #[serde(rename = "Finalizado")]
    Done,
    /// Cancelled.
    #[serde(rename = "Cancelado")]
    Canceled,
}

impl OrderStatus {
    /// All statuses, in the order the status buttons show them.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::InProgress,
        OrderStatus::Done,
        OrderStatus::Canceled,
    ];

    /// The stored literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProgress => "Em Andamento",
            OrderStatus::Done => "Finalizado",
            OrderStatus::Canceled => "Cancelado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = crate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| crate::ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown status '{}'", s),
            })
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Not chosen yet.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// PIX instant transfer.
    #[serde(rename = "pix")]
    Pix,
    /// Credit or debit card.
    #[serde(rename = "cartao")]
    Card,
    /// Cash. The only method with change due.
    #[serde(rename = "dinheiro")]
    Cash,
}

// =============================================================================
// Fulfillment Mode
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FulfillmentMode {
    /// Not chosen yet.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Eat in.
    #[serde(rename = "loja")]
    DineIn,
    /// Customer picks up.
    #[serde(rename = "retirada")]
    Pickup,
    /// Delivered to an address.
    #[serde(rename = "entrega")]
    Delivery,
}

// =============================================================================
// Delivery Address
// =============================================================================

/// Where a delivery order goes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryAddress {
    /// Postal code.
    #[serde(default)]
    pub cep: String,
    #[serde(rename = "rua")]
    #[serde(default)]
    pub street: String,
    #[serde(rename = "bairro")]
    #[serde(default)]
    pub district: String,
    #[serde(rename = "numero")]
    #[serde(default)]
    pub number: String,
    #[serde(rename = "complemento")]
    #[serde(default)]
    pub complement: String,
    /// Landmark to help the courier.
    #[serde(rename = "referencia")]
    #[serde(default)]
    pub reference: String,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line on an order. Uses snapshot pattern to freeze product data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    /// Product as it was when the item was added.
    #[serde(rename = "produto")]
    pub product: Product,

    /// Units ordered (at least 1).
    #[serde(rename = "quantidade")]
    pub quantity: u32,

    /// Kitchen note ("sem cebola").
    #[serde(rename = "observacao")]
    #[serde(default)]
    pub note: Option<String>,
}

impl OrderItem {
    /// Creates an item from a product snapshot.
    pub fn new(product: Product, quantity: u32) -> Self {
        OrderItem {
            product,
            quantity,
            note: None,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order.
///
/// The total is never stored; see [`Order::total`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,

    /// Customer name.
    #[serde(rename = "cliente")]
    pub customer: String,

    #[serde(rename = "itens")]
    #[serde(default)]
    pub items: Vec<OrderItem>,

    #[serde(default)]
    pub status: OrderStatus,

    /// Time the order was taken, `HH:MM`.
    #[serde(rename = "horaPedido")]
    #[serde(default)]
    pub placed_at: String,

    /// Order-level note.
    #[serde(rename = "observacao")]
    #[serde(default)]
    pub note: Option<String>,

    #[serde(rename = "formaPagamento")]
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Cash tendered. Only set when paying in cash.
    #[serde(rename = "valorTroco")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub change_for: Option<Money>,

    #[serde(rename = "formaEntrega")]
    #[serde(default)]
    pub fulfillment: FulfillmentMode,

    /// Only set for deliveries.
    #[serde(rename = "enderecoEntrega")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
}

// =============================================================================
// Unit Tests
// =============================================================================
