//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError                                                              │
//! │  ├── Validation(ValidationError) - malformed arguments                  │
//! │  │     empty id/name, price <= 0, negative quantity, bad percentage     │
//! │  ├── State(StateError)           - operation not allowed right now      │
//! │  │     out of stock, non-discountable product, product not in cart      │
//! │  ├── InvalidConfig                - checkout policy values rejected     │
//! │  └── Fulfillment                  - payment/fulfillment hook failed     │
//! │                                                                         │
//! │  Flow: ValidationError / StateError → CoreError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, counts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every operation fails before it mutates anything

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Top-level error returned by every fallible checkout operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed constructor or operation argument.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The operation conflicts with the current state of a product or cart.
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Checkout policy values are unusable (e.g. negative shipping floor).
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The fulfillment delegate refused or failed to process an order.
    #[error("Fulfillment failed for order {order_id}: {reason}")]
    Fulfillment { order_id: String, reason: String },
}

impl CoreError {
    /// True when the caller passed a malformed argument.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    /// True when the operation clashed with current product or cart state.
    pub fn is_state(&self) -> bool {
        matches!(self, CoreError::State(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any mutation happens, so a failed call leaves every
/// object exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Amount does not fit in a decimal (e.g. price × a huge quantity).
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// State Error
// =============================================================================

/// Business rule violations caused by the current state of an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Not enough inventory to reserve the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// add_product(laptop, 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: "E001", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Cart and inventory untouched
    /// ```
    #[error("Out of stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Discount requested on a product category that never discounts.
    #[error("Product {product_id} is not discountable")]
    NotDiscountable { product_id: String },

    /// Quantity update for a product that has no cart line.
    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
