//! # Repository Module
//!
//! Product and order collections over a [`KeyValueStore`].
//!
//! ## Collection Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Whole-Collection Read-Modify-Write                   │
//! │                                                                         │
//! │  repo.delete("p2")                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  get("@app:produtos") ──► "[{p1},{p2},{p3}]" ──► Vec<Product>          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  retain(id != "p2")   ──► [p1, p3]                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  set("@app:produtos", "[{p1},{p3}]")                                   │
//! │                                                                         │
//! │  No per-record rows, no locking: the last writer wins.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! The plain methods (`load`, `save`, `delete`, ...) never fail: errors are
//! logged and reads degrade to an empty collection. Every one of them has a
//! `try_*` twin returning [`DbResult`] for callers that want to know.
//!
//! A write that needs the current collection aborts if that read fails, so
//! an unreadable collection is never overwritten.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog and derived categories
//! - [`OrderRepository`](order::OrderRepository) - Orders

pub mod order;
pub mod product;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DbError, DbResult};
use crate::kv::KeyValueStore;

/// Key of the product collection.
pub const PRODUCTS_KEY: &str = "@app:produtos";

/// Key of the derived category list.
pub const CATEGORIES_KEY: &str = "@app:categorias";

/// Key of the order collection.
pub const ORDERS_KEY: &str = "@app:pedidos";

/// Reads and decodes the JSON value under `key`.
pub(crate) async fn read_json<S, T>(store: &S, key: &str) -> DbResult<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        None => Ok(None),
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| DbError::serialization(key, e)),
    }
}

/// Encodes `value` as JSON and writes it under `key`.
pub(crate) async fn write_json<S, T>(store: &S, key: &str, value: &T) -> DbResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|e| DbError::serialization(key, e))?;
    store.set(key, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[tokio::test]
    async fn test_json_helpers() {
        let store = MemoryStore::new();
        assert_eq!(read_json::<_, Vec<String>>(&store, "k").await.unwrap(), None);

        write_json(&store, "k", &["a", "b"]).await.unwrap();
        assert_eq!(
            read_json::<_, Vec<String>>(&store, "k").await.unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        store.set("k", "not json").await.unwrap();
        assert!(matches!(
            read_json::<_, Vec<String>>(&store, "k").await,
            Err(DbError::Serialization { .. })
        ));
    }
}
