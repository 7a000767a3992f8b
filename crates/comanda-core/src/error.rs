//! # Error Types
//!
//! Domain-specific error types for comanda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  comanda-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form input failures (shown as a blocking alert)│
//! │                                                                         │
//! │  comanda-db errors (separate crate)                                    │
//! │  └── DbError          - Storage failures (logged, never shown)         │
//! │                                                                         │
//! │  Flow: ValidationError → caller alert, operation aborted, no save      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order cannot be found in the order list.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// A line item index does not point into the item list.
    #[error("Item index {index} out of range ({len} items)")]
    ItemIndexOutOfRange { index: usize, len: usize },

    /// Login token could not be read.
    ///
    /// ## When This Occurs
    /// - Token is not three dot-separated segments
    /// - Payload is not base64url JSON
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These abort the operation before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., product code already taken).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Order has no line items.
    #[error("order must contain at least one item")]
    EmptyOrder,
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
