//! # Catalog Derivations
//!
//! Pure functions over the product collection: the category list, search,
//! grouping for the menu, and the product form.
//!
//! The category list is always derived from the products. Nothing here
//! stores state of its own.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_product, ValidationResult};

/// Distinct category labels, sentinel-substituted, in first-seen order.
///
/// ## Example
/// ```rust
/// use comanda_core::catalog::derive_categories;
/// use comanda_core::types::Product;
///
/// let products = vec![
///     Product { category: Some("Lanches".into()), ..Product::default() },
///     Product { category: None, ..Product::default() },
///     Product { category: Some("Lanches".into()), ..Product::default() },
/// ];
/// assert_eq!(derive_categories(&products), vec!["Lanches", "Sem Categoria"]);
/// ```
pub fn derive_categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .map(Product::category_label)
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive search over name, code and note.
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&query)
                || p.code.to_lowercase().contains(&query)
                || p.note
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&query))
        })
        .collect()
}

/// Product picker match on the order form: name or code.
pub fn pick_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&query) || p.code.to_lowercase().contains(&query))
        .collect()
}

/// One menu section.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: String,
    pub products: Vec<&'a Product>,
}

/// Groups products under each category, in category-list order.
///
/// Categories with no matching products still get a (possibly empty)
/// section, matching how the list screen renders headers.
pub fn group_by_category<'a>(
    categories: &[String],
    products: &[&'a Product],
) -> Vec<CategoryGroup<'a>> {
    categories
        .iter()
        .map(|category| CategoryGroup {
            category: category.clone(),
            products: products
                .iter()
                .copied()
                .filter(|p| p.category_label() == category)
                .collect(),
        })
        .collect()
}

/// Looks a product up by id.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> CoreResult<&'a Product> {
    products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Product Form
// =============================================================================

/// Raw product form input, as typed.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    /// Empty for a new product.
    pub id: String,
    pub name: String,
    pub code: String,
    pub price: String,
    pub category: String,
    pub note: String,
    pub image: Option<String>,
}

impl ProductForm {
    /// Prefills the form for editing.
    pub fn edit(product: &Product) -> Self {
        ProductForm {
            id: product.id.clone(),
            name: product.name.clone(),
            code: product.code.clone(),
            price: product.price.to_string(),
            category: product.category.clone().unwrap_or_default(),
            note: product.note.clone().unwrap_or_default(),
            image: product.image.clone(),
        }
    }

    /// Returns true when editing an existing product.
    pub fn is_editing(&self) -> bool {
        !self.id.is_empty()
    }

    /// Checks required fields and parses the price.
    ///
    /// Code uniqueness is checked by the repository against the stored
    /// catalog.
    pub fn into_product(self) -> ValidationResult<Product> {
        if self.price.trim().is_empty() {
            return Err(ValidationError::required("preco"));
        }
        let price: Money = Money::parse(&self.price).ok_or_else(|| ValidationError::InvalidFormat {
            field: "preco".to_string(),
            reason: format!("'{}' is not a number", self.price.trim()),
        })?;

        let product = Product {
            id: self.id,
            name: self.name.trim().to_string(),
            code: self.code.trim().to_string(),
            price,
            category: non_empty(self.category),
            note: non_empty(self.note),
            image: self.image,
        };

        validate_product(&product)?;
        Ok(product)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
