//! # stockpos-core: Pure Business Logic for StockPOS
//!
//! This crate is the heart of the system: every business rule lives here as
//! a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockPOS Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /sales)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ stockpos-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│   │   │
//! │  │   │  Product  │  │   Money   │  │  balance  │  │   rules   │   │   │
//! │  │   │   Sale    │  │  (cents)  │  │  totals   │  │   checks  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stockpos-db (SQLite repositories, transactional checkout)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, StockMovement, AccountMovement)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Pure balance and total computations
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed in a single sale.
///
/// ## Business Reason
/// Prevents runaway carts and keeps checkout transactions short.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single item in a sale or stock movement.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum price or payment amount, in cents ($100M).
///
/// ## Business Reason
/// Catches fat-fingered amounts, and keeps every line total
/// (price × quantity) and ledger sum far below `i64` overflow.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;
