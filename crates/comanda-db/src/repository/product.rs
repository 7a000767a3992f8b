//! # Product Repository
//!
//! The catalog, stored as one JSON array under `@app:produtos`, plus the
//! category list derived from it under `@app:categorias`.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    save(products)                                       │
//! │                                                                         │
//! │  [X-Burger/Lanches, Suco/Bebidas, Brownie/None]                        │
//! │       │                                                                 │
//! │       ├──► set("@app:produtos",   full array)                          │
//! │       │                                                                 │
//! │       └──► derive_categories ──► ["Lanches", "Bebidas", "Sem Categoria"]│
//! │                 │                                                       │
//! │                 └──► set("@app:categorias", ...)                       │
//! │                                                                         │
//! │  The category list is never edited directly.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, error, info};

use comanda_core::catalog::{derive_categories, find_product, generate_product_id};
use comanda_core::validation::{ensure_unique_code, validate_product, validate_required};
use comanda_core::{Product, UNCATEGORIZED};

use super::{read_json, write_json, CATEGORIES_KEY, PRODUCTS_KEY};
use crate::error::{DbError, DbResult};
use crate::kv::{KeyValueStore, SqliteStore};

/// Repository for the product catalog.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let saved = repo.upsert(product).await?;
/// let categories = repo.load_categories().await;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository<S = SqliteStore> {
    store: S,
}

impl<S: KeyValueStore> ProductRepository<S> {
    /// Creates a new ProductRepository.
    pub fn new(store: S) -> Self {
        ProductRepository { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Loads every product, in stored order.
    pub async fn try_load(&self) -> DbResult<Vec<Product>> {
        let products: Vec<Product> = read_json(&self.store, PRODUCTS_KEY)
            .await?
            .unwrap_or_default();

        debug!(count = products.len(), "Loaded products");
        Ok(products)
    }

    /// Loads every product. Empty when nothing is stored or the stored value
    /// can't be read.
    pub async fn load(&self) -> Vec<Product> {
        self.try_load().await.unwrap_or_else(|e| {
            error!(key = PRODUCTS_KEY, error = %e, "Failed to load products");
            Vec::new()
        })
    }

    /// Replaces the whole catalog and recomputes the category list.
    pub async fn try_save(&self, products: &[Product]) -> DbResult<()> {
        write_json(&self.store, PRODUCTS_KEY, products).await?;

        let categories = derive_categories(products);
        write_json(&self.store, CATEGORIES_KEY, &categories).await?;

        debug!(
            count = products.len(),
            categories = categories.len(),
            "Saved products"
        );
        Ok(())
    }

    /// Replaces the whole catalog. Failures are logged, not reported.
    pub async fn save(&self, products: &[Product]) {
        if let Err(e) = self.try_save(products).await {
            error!(key = PRODUCTS_KEY, error = %e, "Failed to save products");
        }
    }

    /// Loads the derived category list.
    ///
    /// `["Sem Categoria"]` when no catalog was ever saved.
    pub async fn try_load_categories(&self) -> DbResult<Vec<String>> {
        Ok(read_json(&self.store, CATEGORIES_KEY)
            .await?
            .unwrap_or_else(default_categories))
    }

    /// Loads the derived category list, `["Sem Categoria"]` on any failure.
    pub async fn load_categories(&self) -> Vec<String> {
        self.try_load_categories().await.unwrap_or_else(|e| {
            error!(key = CATEGORIES_KEY, error = %e, "Failed to load categories");
            default_categories()
        })
    }

    /// Finds a product by id.
    pub async fn get(&self, id: &str) -> Option<Product> {
        find_product(&self.load().await, id).ok().cloned()
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Removes the product with `id`. Unknown ids leave the catalog as is.
    pub async fn try_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let mut products = self.try_load().await?;
        products.retain(|p| p.id != id);
        self.try_save(&products).await
    }

    /// Removes the product with `id`. Failures are logged.
    pub async fn delete(&self, id: &str) {
        if let Err(e) = self.try_delete(id).await {
            error!(id = %id, error = %e, "Failed to delete product");
        }
    }

    /// Replaces the stored product having the same id, in place.
    ///
    /// Returns false when no product has that id; nothing is added.
    pub async fn try_update(&self, product: &Product) -> DbResult<bool> {
        debug!(id = %product.id, "Updating product");

        let mut products = self.try_load().await?;
        let replaced = replace_by_id(&mut products, product);
        self.try_save(&products).await?;
        Ok(replaced)
    }

    /// Replaces the stored product having the same id. Failures are logged.
    pub async fn update(&self, product: &Product) {
        if let Err(e) = self.try_update(product).await {
            error!(id = %product.id, error = %e, "Failed to update product");
        }
    }

    /// Validates and stores a product from the product form.
    ///
    /// ## Steps
    /// 1. Required fields (`nome`, `codigo`) and a non-negative price
    /// 2. `codigo` not held by a product with another id
    /// 3. Fresh UUID when `id` is empty
    /// 4. Replace by id, or append
    ///
    /// Nothing is written when a check fails.
    pub async fn upsert(&self, product: Product) -> DbResult<Product> {
        let mut products = self.try_load().await?;

        validate_product(&product)?;
        ensure_unique_code(&products, &product)?;

        let mut product = product;
        if product.id.is_empty() {
            product.id = generate_product_id();
        }

        if !replace_by_id(&mut products, &product) {
            products.push(product.clone());
        }
        self.try_save(&products).await?;

        info!(id = %product.id, code = %product.code, "Product saved");
        Ok(product)
    }

    /// Renames a product in place.
    pub async fn rename(&self, id: &str, name: &str) -> DbResult<Product> {
        validate_required("nome", name)?;

        let mut products = self.try_load().await?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("Product", id))?;
        product.name = name.trim().to_string();
        let renamed = product.clone();

        self.try_save(&products).await?;

        debug!(id = %id, name = %renamed.name, "Renamed product");
        Ok(renamed)
    }

    // =========================================================================
    // Clearing
    // =========================================================================

    /// Removes the catalog and the category list. Orders are untouched.
    pub async fn try_clear(&self) -> DbResult<()> {
        self.store.remove(PRODUCTS_KEY).await?;
        self.store.remove(CATEGORIES_KEY).await?;
        info!("Product storage cleared");
        Ok(())
    }

    /// Removes the catalog and the category list. Failures are logged.
    pub async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            error!(error = %e, "Failed to clear product storage");
        }
    }

    /// Wipes the entire store, orders included.
    pub async fn try_clear_all(&self) -> DbResult<()> {
        self.store.clear().await?;
        info!("Entire store cleared");
        Ok(())
    }

    /// Wipes the entire store. Failures are logged.
    pub async fn clear_all(&self) {
        if let Err(e) = self.try_clear_all().await {
            error!(error = %e, "Failed to clear store");
        }
    }
}

fn default_categories() -> Vec<String> {
    vec![UNCATEGORIZED.to_string()]
}

fn replace_by_id(products: &mut [Product], product: &Product) -> bool {
    match products.iter_mut().find(|p| p.id == product.id) {
        Some(slot) => {
            *slot = product.clone();
            true
        }
        None => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
