//! # comanda-db: Persistence Layer for Comanda
//!
//! Keeps the product catalog and the orders on the device. Each collection
//! is one JSON document in a key-value store; the store is a single SQLite
//! table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Data Flow                                │
//! │                                                                         │
//! │  Screen action (confirm order, edit product, ...)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   comanda-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ Repositories  │    │ KeyValueStore │    │  Database    │  │   │
//! │  │   │               │    │   (kv.rs)     │    │  (pool.rs)   │  │   │
//! │  │   │ ProductRepo   │───►│ SqliteStore   │───►│ SqlitePool   │  │   │
//! │  │   │ OrderRepo     │    │ MemoryStore   │    │ migrations   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  kv_store                                                       │   │
//! │  │  @app:produtos | @app:categorias | @app:pedidos                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`kv`] - The key-value store trait and its backends
//! - [`repository`] - Product and order repositories
//! - [`config`] - `comanda.toml`
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comanda_db::{ComandaConfig, Database, DbConfig};
//!
//! let config = ComandaConfig::load_or_default(None);
//! let db = Database::new(DbConfig::from(&config.storage)).await?;
//!
//! let products = db.products().load().await;
//! let orders = db.orders().load().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ComandaConfig;
pub use error::{DbError, DbResult};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::{CATEGORIES_KEY, ORDERS_KEY, PRODUCTS_KEY};

/// Default log filter for binaries, overridden by `RUST_LOG`.
///
/// Targets match by prefix, so `comanda` covers `comanda_core` and
/// `comanda_db`.
pub const DEFAULT_LOG_FILTER: &str = "info,comanda=debug,sqlx=warn";

/// Installs the `tracing` subscriber used by Comanda binaries.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_default_log_filter() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("comanda=debug"));
        assert!(!rendered.contains("comanda_core"));
        assert!(!rendered.contains("comanda_db"));

        init_tracing();
        init_tracing();
    }
}
