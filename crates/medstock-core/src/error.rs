//! # Error Types
//!
//! Domain-specific error types for medstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medstock-core errors (this file)                                      │
//! │  ├── CoreError        - Checkout-level failures (EmptyCart)            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medstock-client errors (separate crate)                               │
//! │  └── ClientError      - Transport, API, session, config failures       │
//! │                                                                         │
//! │  Flow: ValidationError → CartOutcome::Rejected → Presentation          │
//! │        CoreError → ClientError → Presentation                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Cart refusals (stock exceeded, unknown item, quantity below one) are
//! reported through [`crate::cart::CartOutcome`], never through `Err`. An
//! interactive cart expects stale clicks; those must not interrupt the
//! cashier.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was attempted with no lines in the cart.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Complete Sale" (cart empty)
    ///      │
    ///      ▼
    /// to_checkout_request()
    ///      │
    ///      ▼
    /// EmptyCart ──► UI keeps the button disabled / shows "Cart is empty"
    /// ```
    #[error("Cannot check out an empty cart")]
    EmptyCart,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before cart logic runs. Cheap to clone so a
/// refusal can carry it back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. an unparseable price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Cannot check out an empty cart"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "item id".to_string(),
        };
        assert_eq!(err.to_string(), "item id is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }
}
