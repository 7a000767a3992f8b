//! # comanda-core: Pure Business Logic for Comanda
//!
//! Domain types and every derived value the ordering screens show. No I/O
//! lives here; persistence is `comanda-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile frontend                              │   │
//! │  │    Cardápio ──► Sacola ──► Pedido ──► Lista de Pedidos          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comanda-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   order   │  │   cart    │  │  catalog  │  │   │
//! │  │   │  Product  │  │   total   │  │  Sacola   │  │ categories│  │   │
//! │  │   │   Order   │  │  change   │  │           │  │  filters  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 comanda-db (Persistence Layer)                  │   │
//! │  │          key-value store, product and order repositories        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderItem, ...)
//! - [`money`] - Money in integer cents, lenient on read
//! - [`order`] - Totals, change, status, the order draft and list filters
//! - [`cart`] - The customer's sacola
//! - [`catalog`] - Category derivation, search and grouping
//! - [`session`] - Login token decoding
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use comanda_core::money::Money;
//! use comanda_core::order::change_due;
//!
//! let total = Money::from_cents(3490);
//! let tendered = Money::from_cents(5000);
//!
//! assert_eq!(change_due(tendered, total), Some(Money::from_cents(1510)));
//! assert_eq!(change_due(total, total), None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Sacola;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderDraft, OrderFilter};
pub use session::{Access, Session};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category label for products with no category.
pub const UNCATEGORIZED: &str = "Sem Categoria";
