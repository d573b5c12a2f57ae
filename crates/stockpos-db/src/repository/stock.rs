//! # Stock Ledger
//!
//! Append-only log of inventory-affecting events and the **sole mutator**
//! of `products.stock`.
//!
//! ## Guarded Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Why the UPDATE is guarded                            │
//! │                                                                         │
//! │  ❌ WRONG: read stock, compare in Rust, then write the new value        │
//! │     Two concurrent exits can both pass the comparison and jointly       │
//! │     overdraw stock below zero.                                          │
//! │                                                                         │
//! │  ✅ CORRECT: atomic conditional decrement                               │
//! │     UPDATE products SET stock = stock - ?                               │
//! │     WHERE id = ? AND stock >= ?                                         │
//! │                                                                         │
//! │     rows_affected == 0 ⇒ insufficient stock, nothing changed.           │
//! │     The storage engine, not application locking, decides the race.      │
//! │     A CHECK (stock >= 0) constraint backstops the invariant.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Movement row + stock update always commit or roll back together: manual
//! movements open their own IMMEDIATE transaction here, sale-driven exits
//! run inside the checkout transaction via [`apply_exit`].

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{self, product};
use stockpos_core::{validation, CoreError, MovementKind, Product, StockMovement, StockMovementView};

/// Repository for the stock ledger.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Records a manual stock movement (goods received or removed).
    ///
    /// Stock update and movement row are one atomic unit: both succeed or
    /// both are rolled back.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain)` - quantity ≤ 0, or insufficient stock on exit
    /// * `Err(DbError::NotFound)` - product doesn't exist
    pub async fn record(
        &self,
        product_id: &str,
        quantity: i64,
        kind: MovementKind,
    ) -> DbResult<StockMovement> {
        validation::validate_quantity(quantity)?;

        debug!(product_id = %product_id, quantity = %quantity, ?kind, "Recording stock movement");

        // IMMEDIATE: read-then-write, same queuing discipline as checkout.
        let mut conn = repository::begin_immediate(&self.pool).await?;

        match record_in_tx(&mut conn, product_id, quantity, kind).await {
            Ok(movement) => {
                repository::commit(conn).await?;
                Ok(movement)
            }
            Err(e) => {
                repository::rollback(conn).await;
                Err(e)
            }
        }
    }

    /// Lists all movements, newest first, enriched with product and client
    /// display names.
    ///
    /// The LEFT JOINs tolerate deleted referents: a movement whose product
    /// or client has been removed comes back with a `None` name rather than
    /// failing.
    pub async fn list(&self) -> DbResult<Vec<StockMovementView>> {
        let movements = sqlx::query_as::<_, StockMovementView>(
            r#"
            SELECT
                m.id,
                m.product_id,
                m.quantity,
                m.kind,
                m.sale_id,
                m.client_id,
                m.created_at,
                p.name AS product_name,
                c.name AS client_name
            FROM stock_movements m
            LEFT JOIN products p ON p.id = m.product_id
            LEFT JOIN clients c ON c.id = m.client_id
            ORDER BY m.created_at DESC, m.rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}

/// Body of a manual-movement transaction. Any error here makes the caller
/// roll the whole transaction back.
async fn record_in_tx(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
    kind: MovementKind,
) -> DbResult<StockMovement> {
    let product = product::fetch_by_id(conn, product_id)
        .await?
        .ok_or_else(|| DbError::not_found("Product", product_id))?;

    match kind {
        MovementKind::Entry => apply_entry(conn, &product, quantity, None, None).await,
        MovementKind::Exit => apply_exit(conn, &product, quantity, None, None).await,
    }
}

// =============================================================================
// Transaction-Scoped Primitives
// =============================================================================
// These are the only two code paths in the workspace that write
// products.stock. They run on an explicit connection so callers control the
// transaction boundary.

/// Increments stock and appends the ENTRADA movement row.
pub(crate) async fn apply_entry(
    conn: &mut SqliteConnection,
    product: &Product,
    quantity: i64,
    sale_id: Option<&str>,
    client_id: Option<&str>,
) -> DbResult<StockMovement> {
    let result = sqlx::query("UPDATE products SET stock = stock + ?2 WHERE id = ?1")
        .bind(&product.id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", &product.id));
    }

    insert_movement(
        conn,
        product,
        quantity,
        MovementKind::Entry,
        sale_id,
        client_id,
        Utc::now(),
    )
    .await
}

/// Decrements stock (guarded, never below zero) and appends the SALIDA
/// movement row.
///
/// ## Errors
/// `DbError::Domain(InsufficientStock)` when available stock is less than
/// `quantity`; the caller's transaction must then roll back.
pub(crate) async fn apply_exit(
    conn: &mut SqliteConnection,
    product: &Product,
    quantity: i64,
    sale_id: Option<&str>,
    client_id: Option<&str>,
) -> DbResult<StockMovement> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(&product.id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        // Within this transaction's snapshot the earlier read is current,
        // so the available count names the real shortfall.
        return Err(DbError::Domain(CoreError::InsufficientStock {
            sku: product.sku.clone(),
            available: product.stock,
            requested: quantity,
        }));
    }

    insert_movement(
        conn,
        product,
        quantity,
        MovementKind::Exit,
        sale_id,
        client_id,
        Utc::now(),
    )
    .await
}

/// Appends one immutable movement row.
async fn insert_movement(
    conn: &mut SqliteConnection,
    product: &Product,
    quantity: i64,
    kind: MovementKind,
    sale_id: Option<&str>,
    client_id: Option<&str>,
    created_at: DateTime<Utc>,
) -> DbResult<StockMovement> {
    let movement = StockMovement {
        id: Uuid::new_v4().to_string(),
        product_id: product.id.clone(),
        quantity,
        kind,
        sale_id: sale_id.map(str::to_string),
        client_id: client_id.map(str::to_string),
        created_at,
    };

    sqlx::query(
        r#"
        INSERT INTO stock_movements (id, product_id, quantity, kind, sale_id, client_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.product_id)
    .bind(movement.quantity)
    .bind(movement.kind)
    .bind(&movement.sale_id)
    .bind(&movement.client_id)
    .bind(movement.created_at)
    .execute(conn)
    .await?;

    Ok(movement)
}
