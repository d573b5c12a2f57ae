//! # Error Types
//!
//! Domain-specific error types for stockpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockpos-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  stockpos-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures (wraps CoreError)   │
//! │                                                                         │
//! │  API errors (in app)                                                    │
//! │  └── ApiError         - What the frontend sees ({"error": msg})         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, ID, quantities)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are recoverable at the
/// request boundary: the API layer maps them to 4xx responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to complete a sale or a manual exit movement.
    ///
    /// ## When This Occurs
    /// - A checkout requests more units than are available for any item
    /// - A manual SALIDA movement exceeds current stock
    ///
    /// The whole operation fails; partial fulfillment is never allowed.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// A sale was submitted with no items.
    #[error("Sale must contain at least one item")]
    EmptySale,

    /// Sale has exceeded the maximum allowed number of items.
    #[error("Sale cannot have more than {max} items")]
    SaleTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before any storage work happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive (quantities, payment amounts).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative (prices, initial stock).
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. bad SKU characters).
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
        let err = CoreError::InsufficientStock {
            sku: "COKE-330".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for COKE-330: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        };
        assert_eq!(err.to_string(), "cantidad must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
