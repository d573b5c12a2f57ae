//! # Client Account Ledger
//!
//! Append-only record of client debits (COMPRA) and credits (PAGO), and the
//! derived running balance.
//!
//! ## Derived, Never Stored
//! There is no `balance` column anywhere. The balance is recomputed from
//! the full history on every read ([`stockpos_core::ledger::balance`]),
//! trading O(history) reads for the absence of a whole class of
//! stale-cache bugs. Ledger sizes in this domain make that a good trade.
//!
//! History is returned **oldest first** (chronological); consumers that
//! want the latest entry take the last element.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::client;
use stockpos_core::{ledger, validation, AccountKind, AccountMovement, Money};

/// Repository for the client account ledger.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Records a payment (credit) on a client's account.
    ///
    /// Payments are NOT deduplicated: two identical calls produce two
    /// distinct entries and double-credit the balance, by design.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain)` - amount ≤ 0
    /// * `Err(DbError::NotFound)` - unknown client
    pub async fn record_payment(
        &self,
        client_id: &str,
        amount_cents: i64,
        payment_method: &str,
        description: Option<&str>,
    ) -> DbResult<AccountMovement> {
        validation::validate_amount_cents(amount_cents)?;

        debug!(client_id = %client_id, amount = %amount_cents, "Recording payment");

        let mut conn = self.pool.acquire().await?;

        client::fetch_by_id(&mut conn, client_id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", client_id))?;

        let movement = AccountMovement {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            kind: AccountKind::Payment,
            amount_cents,
            description: description.map(str::to_string),
            payment_method: Some(payment_method.to_string()),
            sale_id: None,
            created_at: Utc::now(),
        };

        insert_movement(&mut conn, &movement).await?;

        Ok(movement)
    }

    /// Returns a client's full account history, oldest first.
    ///
    /// An unknown client yields an empty history; existence checks belong
    /// to the caller.
    pub async fn history(&self, client_id: &str) -> DbResult<Vec<AccountMovement>> {
        let movements = sqlx::query_as::<_, AccountMovement>(
            r#"
            SELECT id, client_id, kind, amount_cents, description,
                   payment_method, sale_id, created_at
            FROM account_movements
            WHERE client_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Computes a client's running balance from their history.
    ///
    /// Positive means the client owes money. Empty history yields zero.
    pub async fn balance(&self, client_id: &str) -> DbResult<Money> {
        let history = self.history(client_id).await?;
        Ok(ledger::balance(&history))
    }
}

// =============================================================================
// Transaction-Scoped Primitives
// =============================================================================

/// Appends the COMPRA debit for a committed sale.
///
/// Runs inside the checkout transaction, so the debit becomes visible
/// exactly when the sale and its stock exits do.
pub(crate) async fn insert_purchase(
    conn: &mut SqliteConnection,
    client_id: &str,
    amount: Money,
    sale_id: &str,
    created_at: DateTime<Utc>,
) -> DbResult<AccountMovement> {
    let movement = AccountMovement {
        id: Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        kind: AccountKind::Purchase,
        amount_cents: amount.cents(),
        description: Some(format!("Venta {}", &sale_id[..8])),
        payment_method: None,
        sale_id: Some(sale_id.to_string()),
        created_at,
    };

    insert_movement(conn, &movement).await?;

    Ok(movement)
}

/// Appends one immutable account entry.
async fn insert_movement(conn: &mut SqliteConnection, movement: &AccountMovement) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO account_movements
            (id, client_id, kind, amount_cents, description,
             payment_method, sale_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.client_id)
    .bind(movement.kind)
    .bind(movement.amount_cents)
    .bind(&movement.description)
    .bind(&movement.payment_method)
    .bind(&movement.sale_id)
    .bind(movement.created_at)
    .execute(conn)
    .await?;

    Ok(())
}
