//! # Validation Module
//!
//! Checks run before anything is written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  └── Field-level "Campo obrigatório" hints                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required product fields (nome, codigo)                            │
//! │  ├── Product code uniqueness (linear scan)                             │
//! │  └── Order has a customer and at least one item                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Failure: operation aborted, nothing saved                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{Order, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Rejects a value that is empty after trimming.
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_required;
///
/// assert!(validate_required("cliente", "Ana").is_ok());
/// assert!(validate_required("cliente", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates a line item quantity (at least 1).
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantidade".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates the required product fields.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required("nome", &product.name)?;
    validate_required("codigo", &product.code)?;

    if product.price.is_negative() {
        return Err(ValidationError::InvalidFormat {
            field: "preco".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    Ok(())
}

/// Rejects a product whose code is already held by a different product.
///
/// Products with the same `id` are the same record being edited and never
/// conflict with themselves.
///
/// ## Example
/// ```rust
/// use comanda_core::types::Product;
/// use comanda_core::validation::ensure_unique_code;
///
/// let stored = vec![Product { id: "1".into(), code: "XB".into(), ..Product::default() }];
///
/// let edit = Product { id: "1".into(), code: "XB".into(), ..Product::default() };
/// assert!(ensure_unique_code(&stored, &edit).is_ok());
///
/// let clash = Product { id: "2".into(), code: "XB".into(), ..Product::default() };
/// assert!(ensure_unique_code(&stored, &clash).is_err());
/// ```
pub fn ensure_unique_code(existing: &[Product], candidate: &Product) -> ValidationResult<()> {
    let taken = existing
        .iter()
        .any(|p| p.code == candidate.code && p.id != candidate.id);

    if taken {
        return Err(ValidationError::Duplicate {
            field: "codigo".to_string(),
            value: candidate.code.clone(),
        });
    }

    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates an order before it is confirmed.
pub fn validate_order(order: &Order) -> ValidationResult<()> {
    validate_required("cliente", &order.customer)?;

    if order.items.is_empty() {
        return Err(ValidationError::EmptyOrder);
    }

    for item in &order.items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
