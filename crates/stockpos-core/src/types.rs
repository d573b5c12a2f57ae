//! # Domain Types
//!
//! Core domain types used throughout StockPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │      Sale       │   │ StockMovement   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │        │
//! │  │  sku (business) │   │  client_id      │   │  product_id     │        │
//! │  │  price_cents    │   │  total_cents    │   │  kind (±)       │        │
//! │  │  stock          │   │  SaleItem[]     │   │  quantity       │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Client       │   │    Category     │   │ AccountMovement │        │
//! │  │  id, name,      │   │  id, name       │   │  kind: COMPRA/  │        │
//! │  │  email?, phone? │   │  (unique)       │   │  PAGO, amount   │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Append-Only Ledgers
//! `StockMovement`, `Sale`/`SaleItem` and `AccountMovement` are immutable
//! once created. Corrections are modeled as new offsetting entries, never as
//! updates or deletes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category. Name is unique.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across categories.
    pub name: String,

    /// When the category was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// `stock` is mutated exclusively by the stock ledger (stockpos-db's stock
/// module); no other component writes it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit - business identifier, unique and non-empty.
    pub sku: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Optional category reference.
    pub category_id: Option<String>,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity can be taken from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Client
// =============================================================================

/// A client with a running current account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
///
/// Wire and storage values are the Spanish labels the consuming frontend
/// already uses: `ENTRADA` (stock in) and `SALIDA` (stock out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum MovementKind {
    /// Goods received; increments stock.
    #[serde(rename = "ENTRADA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ENTRADA"))]
    Entry,
    /// Goods leaving; decrements stock. Guarded so stock never goes negative.
    #[serde(rename = "SALIDA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "SALIDA"))]
    Exit,
}

/// An append-only record of one stock-affecting event.
///
/// Sale-driven exits carry the originating sale and client references;
/// manual movements leave them empty.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    /// Units moved. Always positive; direction comes from `kind`.
    pub quantity: i64,
    pub kind: MovementKind,
    /// Originating sale, when this exit was produced by a checkout.
    pub sale_id: Option<String>,
    /// Client of the originating sale.
    pub client_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A stock movement enriched (read-only join) with display names.
///
/// `product_name`/`client_name` are `None` when the referent has been
/// deleted; the movement row itself is never touched by deletes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovementView {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub kind: MovementKind,
    pub sale_id: Option<String>,
    pub client_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Product display name; `None` if the product was deleted.
    pub product_name: Option<String>,
    /// Client display name; `None` for manual movements or deleted clients.
    pub client_name: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub client_id: String,
    /// Sum of all line totals, in cents.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen, independent of later
    /// catalog price changes).
    pub unit_price_cents: i64,
    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Account Movement
// =============================================================================

/// Kind of a client current-account entry.
///
/// Wire and storage values follow the frontend: `COMPRA` (debit, client
/// owes more) and `PAGO` (credit, client paid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum AccountKind {
    #[serde(rename = "COMPRA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "COMPRA"))]
    Purchase,
    #[serde(rename = "PAGO")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "PAGO"))]
    Payment,
}

/// An append-only entry in a client's current account.
///
/// Balance is always derived from the full sequence of these entries
/// (see [`crate::ledger::balance`]), never stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AccountMovement {
    pub id: String,
    pub client_id: String,
    pub kind: AccountKind,
    /// Amount in cents. Always positive; direction comes from `kind`.
    pub amount_cents: i64,
    /// Free-form description (e.g. "Venta #...", "Pago en efectivo").
    pub description: Option<String>,
    /// Payment method for PAGO entries (free-form, e.g. "efectivo").
    pub payment_method: Option<String>,
    /// Originating sale for COMPRA entries.
    pub sale_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl AccountMovement {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Signed contribution of this entry to the running balance.
    /// Positive for purchases (client owes more), negative for payments.
    #[inline]
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            AccountKind::Purchase => self.amount(),
            AccountKind::Payment => Money::zero() - self.amount(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
