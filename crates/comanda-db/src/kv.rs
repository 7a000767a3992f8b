//! # Key-Value Store
//!
//! The string-keyed store every collection lives in.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KeyValueStore                                        │
//! │                                                                         │
//! │  ProductRepository ──┐                                                 │
//! │                      ├──► get / set / remove / clear                   │
//! │  OrderRepository ────┘          │                                       │
//! │                                 │                                       │
//! │              ┌──────────────────┴──────────────────┐                   │
//! │              ▼                                     ▼                   │
//! │  ┌───────────────────────┐            ┌───────────────────────┐        │
//! │  │     SqliteStore       │            │     MemoryStore       │        │
//! │  │  kv_store table (WAL) │            │  RwLock<HashMap>      │        │
//! │  │  survives restarts    │            │  tests, previews      │        │
//! │  └───────────────────────┘            └───────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque strings here. JSON encoding happens in the
//! repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::DbResult;

/// Async string-keyed storage.
///
/// `set` replaces the whole value. There are no transactions across keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` if never written.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;

    /// Removes every key.
    async fn clear(&self) -> DbResult<()>;
}

// =============================================================================
// SQLite Backend
// =============================================================================

/// Store backed by the `kv_store` table.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./comanda.db")).await?;
/// let store = db.store();
/// store.set("@app:pedidos", "[]").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store over an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    /// Lists stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "kv get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "kv set");
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, "kv remove");
        Ok(())
    }

    async fn clear(&self) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM kv_store")
            .execute(&self.pool)
            .await?;

        debug!(removed = result.rows_affected(), "kv clear");
        Ok(())
    }
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// Store kept in process memory. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Creates a store holding `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MemoryStore {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> DbResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("@app:pedidos").await.unwrap(), None);

        store.set("@app:pedidos", "[]").await.unwrap();
        store.set("@app:produtos", "[1]").await.unwrap();
        store.set("@app:produtos", "[2]").await.unwrap();
        assert_eq!(
            store.get("@app:produtos").await.unwrap().as_deref(),
            Some("[2]")
        );

        store.remove("@app:pedidos").await.unwrap();
        store.remove("@app:pedidos").await.unwrap();
        assert_eq!(store.get("@app:pedidos").await.unwrap(), None);

        store.clear().await.unwrap();
        assert_eq!(store.get("@app:produtos").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        exercise(&store).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let a = MemoryStore::with_entries([("k", "v")]);
        let b = a.clone();
        b.set("k2", "v2").await.unwrap();
        assert_eq!(a.len().await, 2);
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.store();
        exercise(&store).await;

        store.set("b", "2").await.unwrap();
        store.set("a", "1").await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["a", "b"]);
    }
}
