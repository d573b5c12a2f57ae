//! # Ledger Arithmetic
//!
//! Pure computations over the append-only ledgers: running balances and
//! sale totals.
//!
//! ## Derived Balance, Never Stored
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Balance Derivation                                   │
//! │                                                                         │
//! │  account_movements (oldest first)                                       │
//! │    COMPRA  $40.00   ──►  +4000                                          │
//! │    PAGO    $15.00   ──►  −1500                                          │
//! │    COMPRA  $10.00   ──►  +1000                                          │
//! │                          ──────                                         │
//! │  balance                  3500  (positive ⇒ client owes money)          │
//! │                                                                         │
//! │  The balance is recomputed from history on every read. There is no      │
//! │  cached column that can drift out of sync with the ledger.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::Money;
use crate::types::{AccountMovement, SaleItem};

/// Computes a client's running balance from their full account history.
///
/// Balance = Σ(COMPRA amounts) − Σ(PAGO amounts). An empty history yields
/// zero. Positive means the client owes money; negative means the client
/// has credit.
pub fn balance(history: &[AccountMovement]) -> Money {
    history.iter().map(AccountMovement::signed_amount).sum()
}

/// Computes the line total for one sale item (unit price × quantity).
pub fn line_total(unit_price: Money, quantity: i64) -> Money {
    unit_price * quantity
}

/// Computes a sale total as the sum of its line totals.
pub fn sale_total(items: &[SaleItem]) -> Money {
    items.iter().map(SaleItem::line_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountKind;
    use chrono::Utc;

    fn movement(kind: AccountKind, amount_cents: i64) -> AccountMovement {
        AccountMovement {
            id: "m".into(),
            client_id: "c1".into(),
            kind,
            amount_cents,
            description: None,
            payment_method: None,
            sale_id: None,
            created_at: Utc::now(),
        }
    }

    fn item(unit_price_cents: i64, quantity: i64) -> SaleItem {
        SaleItem {
            id: "i".into(),
            sale_id: "s".into(),
            product_id: "p".into(),
            name_snapshot: "Product".into(),
            quantity,
            unit_price_cents,
            line_total_cents: unit_price_cents * quantity,
        }
    }

    #[test]
    fn test_empty_history_balance_is_zero() {
        assert_eq!(balance(&[]), Money::zero());
    }

    #[test]
    fn test_balance_is_purchases_minus_payments() {
        let history = vec![
            movement(AccountKind::Purchase, 4000),
            movement(AccountKind::Payment, 1500),
            movement(AccountKind::Purchase, 1000),
        ];

        assert_eq!(balance(&history).cents(), 3500);
    }

    #[test]
    fn test_balance_can_go_negative() {
        // Client overpaid: they hold credit.
        let history = vec![
            movement(AccountKind::Purchase, 1000),
            movement(AccountKind::Payment, 2500),
        ];

        let b = balance(&history);
        assert!(b.is_negative());
        assert_eq!(b.cents(), -1500);
    }

    #[test]
    fn test_duplicate_payments_both_count() {
        // No deduplication by design: two identical payments double-credit.
        let history = vec![
            movement(AccountKind::Purchase, 5000),
            movement(AccountKind::Payment, 2000),
            movement(AccountKind::Payment, 2000),
        ];

        assert_eq!(balance(&history).cents(), 1000);
    }

    #[test]
    fn test_sale_total() {
        // Worked example: A price $10.00 × 2, B price $20.00 × 1.
        let items = vec![item(1000, 2), item(2000, 1)];
        assert_eq!(sale_total(&items).cents(), 4000);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Money::from_cents(150), 4).cents(), 600);
    }

    #[test]
    fn test_largest_valid_line_total_stays_in_range() {
        use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY};

        // The validation ceilings exist so this product never overflows.
        let total = line_total(Money::from_cents(MAX_AMOUNT_CENTS), MAX_ITEM_QUANTITY);
        assert_eq!(total.cents(), MAX_AMOUNT_CENTS * MAX_ITEM_QUANTITY);
    }
}
