//! # Error Types
//!
//! Domain-specific error types for ribbon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ribbon-core (this file)                                               │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ribbon-db            DbError      - Database operation failures       │
//! │  ribbon-api           ApiError     - HTTP status + envelope            │
//! │  ribbon-client        ClientError  - Transport / HTTP failures         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → {success:false, ...}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::checkout::CheckoutStep;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product exists with this SKU.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Not enough stock to fill an order line.
    ///
    /// ## User Workflow
    /// ```text
    /// Place Order (R1 × 5)
    ///      │
    ///      ▼
    /// Stock check: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "R1", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Checkout shows: "Only 3 of R1 left in stock"
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order status cannot move from `from` to `to`.
    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// An order was submitted with no purchasable lines.
    #[error("Order has no items")]
    EmptyOrder,

    /// A checkout action was attempted on the wrong step.
    #[error("Checkout is on step {current:?}, expected {expected:?}")]
    WrongCheckoutStep {
        current: CheckoutStep,
        expected: CheckoutStep,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// The same value appears twice where it must be unique (e.g. a SKU
    /// repeated inside one order).
    #[error("{field} '{value}' is duplicated")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
