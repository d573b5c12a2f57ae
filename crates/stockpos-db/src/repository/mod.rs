//! # Repository Module
//!
//! Database repository implementations for StockPOS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │   db.sales().checkout(client_id, items)                         │
//! │       ▼                                                                 │
//! │  SaleRepository ──── one transaction ────┐                              │
//! │       │ reads products                   │                              │
//! │       │ inserts sale + items             │                              │
//! │       ├──► stock::apply_exit  (guarded stock decrement + movement row)  │
//! │       └──► account::insert_purchase  (client debit)                     │
//! │                                          │                              │
//! │       commit ◄───────────────────────────┘   any error ⇒ full rollback  │
//! │                                                                         │
//! │  stock.rs is the ONLY module that writes products.stock. The catalog    │
//! │  repository never touches it beyond the initial insert.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog CRUD
//! - [`category::CategoryRepository`] - Category CRUD
//! - [`client::ClientRepository`] - Client CRUD
//! - [`stock::StockRepository`] - Stock ledger (sole stock writer)
//! - [`sale::SaleRepository`] - Transactional checkout
//! - [`account::AccountRepository`] - Client current-account ledger

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};
use tracing::warn;

use crate::error::DbResult;

pub mod account;
pub mod category;
pub mod client;
pub mod product;
pub mod sale;
pub mod stock;

// =============================================================================
// Write-Transaction Primitives
// =============================================================================

/// Opens a write transaction with `BEGIN IMMEDIATE`.
///
/// A deferred transaction takes the write lock at its first write. Two
/// checkouts that both read stock first would then collide at write time,
/// and SQLite reports the collision as a busy/stale-snapshot error, not as
/// a domain condition. IMMEDIATE takes the write lock up front: concurrent
/// writers queue on the busy timeout, and each transaction reads stock that
/// is current when its turn comes, so a genuine shortfall always surfaces
/// as [`stockpos_core::CoreError::InsufficientStock`].
pub(crate) async fn begin_immediate(pool: &SqlitePool) -> DbResult<PoolConnection<Sqlite>> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
    Ok(conn)
}

/// Commits a transaction opened with [`begin_immediate`].
///
/// On a failed COMMIT the transaction is rolled back before the connection
/// returns to the pool; a pooled connection must never carry an open
/// transaction.
pub(crate) async fn commit(mut conn: PoolConnection<Sqlite>) -> DbResult<()> {
    if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
        let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
        return Err(e.into());
    }
    Ok(())
}

/// Rolls back a transaction opened with [`begin_immediate`].
///
/// Best-effort: the caller is already on an error path, and the original
/// error is the one worth reporting.
pub(crate) async fn rollback(mut conn: PoolConnection<Sqlite>) {
    if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
        warn!(?e, "Rollback failed");
    }
}
