//! # Validation Module
//!
//! Input validation utilities for StockPOS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (Rust)                                           │
//! │  ├── Type validation (serde deserialization)                            │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                             │
//! │  ├── NOT NULL / UNIQUE constraints (duplicate SKU)                      │
//! │  └── CHECK constraints (stock >= 0, quantity > 0)                       │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockpos_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product, category or client).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "nombre".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "nombre".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock-movement or sale-item quantity.
///
/// Quantities are always expressed as positive units; direction comes from
/// the movement kind.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "cantidad".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items), negative is
/// not, and the ceiling keeps line totals inside `i64` at any quantity.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "precio".to_string(),
        });
    }

    if price_cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "precio".to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates an initial stock level. Negative stock is never representable.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a payment or purchase amount in cents. Must be strictly
/// positive (a zero-amount ledger entry carries no information) and below
/// the same ceiling as prices.
pub fn validate_amount_cents(amount_cents: i64) -> ValidationResult<()> {
    if amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "monto".to_string(),
        });
    }

    if amount_cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "monto".to_string(),
            min: 1,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("COKE-330").is_ok());
        assert!(validate_sku("abc_123").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
        assert!(validate_sku("BAD SKU!").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Coca-Cola 330ml").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(MAX_AMOUNT_CENTS).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_price_cents(MAX_AMOUNT_CENTS + 1).is_err());
        assert!(validate_price_cents(i64::MAX).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount_cents(1).is_ok());
        assert!(validate_amount_cents(MAX_AMOUNT_CENTS).is_ok());
        assert!(validate_amount_cents(0).is_err());
        assert!(validate_amount_cents(-500).is_err());
        assert!(validate_amount_cents(i64::MAX).is_err());
    }
}
