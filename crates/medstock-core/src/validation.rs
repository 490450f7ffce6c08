//! # Validation Module
//!
//! Input validation for cart operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (TypeScript)                                    │
//! │  └── Disables "-" at quantity 1, "Complete Sale" on empty cart         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart Engine (THIS MODULE)                                    │
//! │  └── Quantity >= 1, price >= 0                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pharmacy API                                                 │
//! │  └── Stock decrement is enforced server-side                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;


// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0); there is no zero-quantity line, not even
///   transiently
/// - The upper bound is stock, which the cart checks itself
///
/// ## User Workflow
/// ```text
/// Cashier types 0 in the quantity box
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      └── Error: "quantity must be positive" → line keeps its quantity
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (free samples)
/// - No upper bound
///
/// ## Example
/// ```rust
/// use medstock_core::money::Money;
/// use medstock_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
