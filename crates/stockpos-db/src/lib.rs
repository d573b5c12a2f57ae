//! # stockpos-db: Database Layer for StockPOS
//!
//! This crate provides database access for StockPOS. It uses SQLite with
//! sqlx for async operations and owns the two transaction boundaries that
//! make the system correct under concurrent requests: the stock ledger and
//! the sale checkout.
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
//! │  │                     stockpos-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  product      │    │  (embedded)  │   │   │
//! │  │   │               │    │  category     │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│  client       │    │ 001_init.sql │   │   │
//! │  │   │ Connection    │    │  stock ★      │    └──────────────┘   │   │
//! │  │   │ Management    │    │  sale  ★      │                       │   │
//! │  │   └───────────────┘    │  account      │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  │   ★ = transactional; sole writers of stock / ledgers           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::category::CategoryRepository;
pub use repository::client::ClientRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::{CheckoutItem, SaleRepository};
pub use repository::stock::StockRepository;
