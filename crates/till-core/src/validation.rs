//! # Validation Module
//!
//! Argument checks shared by constructors and operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fail Fast, Mutate Later                            │
//! │                                                                         │
//! │  Product::electronic(...)  ──► validate_required / validate_price ...  │
//! │  Cart::add_product(p, n)   ──► validate_quantity, then stock check     │
//! │  Product::apply_discount   ──► validate_percentage                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Only after every check passes does any field change                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_required, validate_quantity};
//!
//! assert!(validate_required("id", "E001").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only text.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_required;
///
/// assert!(validate_required("name", "Laptop").is_ok());
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price.
///
/// ## Rules
/// - Must be strictly positive (> 0); free items are not allowed
pub fn validate_price(price: Decimal) -> ValidationResult<()> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an inventory count or an inventory adjustment.
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Adds `delta` to a non-negative count, rejecting results past `i64::MAX`.
pub fn validate_count_sum(field: &str, current: i64, delta: i64) -> ValidationResult<i64> {
    current
        .checked_add(delta)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        })
}

/// Validates a quantity being added to a cart.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## User Workflow
/// ```text
/// add_product(book, 2)
///       │
///       ▼
/// validate_quantity(2) ← THIS FUNCTION
///       │
///       ├── qty <= 0? → Error: "quantity must be positive"
///       │
///       └── OK → stock check → reserve
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be within 0..=100
pub fn validate_percentage(percentage: Decimal) -> ValidationResult<()> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a shipping weight.
pub fn validate_weight(weight: Decimal) -> ValidationResult<()> {
    if weight < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "weight".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
