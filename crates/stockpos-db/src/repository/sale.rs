//! # Sale Repository
//!
//! The sale engine: converts a cart of items into a committed Sale, stock
//! deductions, and a client debit — as one atomic unit.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       checkout(client, items)                           │
//! │                                                                         │
//! │  BEGIN IMMEDIATE      (write lock up front; concurrent checkouts        │
//! │                        queue on the busy timeout)                       │
//! │   1. client exists?                 ── no ──► NotFound, rollback        │
//! │   2. per item: read product,                                            │
//! │      capture price + name,                                              │
//! │      stock sufficient?              ── no ──► InsufficientStock,        │
//! │                                               rollback                  │
//! │   3. INSERT sale + sale_items (price-at-sale snapshots)                 │
//! │   4. per item: stock::apply_exit    (guarded decrement + SALIDA row)    │
//! │   5. account::insert_purchase       (one COMPRA debit for the total)    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error between BEGIN and COMMIT drops the transaction: no sale,     │
//! │  no movements, no debit, no stock change. Partial fulfillment is        │
//! │  not a thing.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{self, account, client, product, stock};
use stockpos_core::{
    ledger, validation, CoreError, Money, Product, Sale, SaleItem, MAX_SALE_ITEMS,
};

/// One requested line in a checkout: which product, how many units.
#[derive(Debug, Clone)]
pub struct CheckoutItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Repository for sale operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a multi-item sale atomically.
    ///
    /// Prices are captured at sale time: later catalog price changes never
    /// rewrite history. Stock is decremented through the stock ledger, and
    /// one COMPRA debit for the sale total lands on the client's account.
    ///
    /// ## Returns
    /// The committed sale and its line items, in request order.
    ///
    /// ## Errors
    /// * `DbError::Domain(EmptySale)` - no items
    /// * `DbError::Domain(Validation)` - a quantity ≤ 0
    /// * `DbError::NotFound` - unknown client or product
    /// * `DbError::Domain(InsufficientStock)` - any item over-requests;
    ///   names the offending product's SKU
    pub async fn checkout(
        &self,
        client_id: &str,
        items: &[CheckoutItem],
    ) -> DbResult<(Sale, Vec<SaleItem>)> {
        if items.is_empty() {
            return Err(DbError::Domain(CoreError::EmptySale));
        }
        if items.len() > MAX_SALE_ITEMS {
            return Err(DbError::Domain(CoreError::SaleTooLarge {
                max: MAX_SALE_ITEMS,
            }));
        }
        for item in items {
            validation::validate_quantity(item.quantity)?;
        }

        debug!(client_id = %client_id, items = items.len(), "Starting checkout");

        // IMMEDIATE: hold the write lock for the whole read-then-write
        // sequence, so the stock this transaction reads is the stock it
        // decrements.
        let mut conn = repository::begin_immediate(&self.pool).await?;

        match checkout_in_tx(&mut conn, client_id, items).await {
            Ok((sale, sale_items)) => {
                repository::commit(conn).await?;

                info!(
                    sale_id = %sale.id,
                    client_id = %sale.client_id,
                    total = %sale.total(),
                    items = sale_items.len(),
                    "Sale committed"
                );

                Ok((sale, sale_items))
            }
            Err(e) => {
                repository::rollback(conn).await;
                Err(e)
            }
        }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, client_id, total_cents, created_at FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all items for a sale, in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name_snapshot, quantity,
                   unit_price_cents, line_total_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

/// Body of the checkout transaction. Any error here makes the caller roll
/// the whole transaction back.
async fn checkout_in_tx(
    conn: &mut SqliteConnection,
    client_id: &str,
    items: &[CheckoutItem],
) -> DbResult<(Sale, Vec<SaleItem>)> {
    let client = client::fetch_by_id(conn, client_id)
        .await?
        .ok_or_else(|| DbError::not_found("Client", client_id))?;

    // Step 1: read every product and check availability up front, so a
    // shortfall on the last item costs no partial work.
    let mut products: Vec<Product> = Vec::with_capacity(items.len());
    for item in items {
        let p = product::fetch_by_id(conn, &item.product_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &item.product_id))?;

        if !p.can_sell(item.quantity) {
            return Err(DbError::Domain(CoreError::InsufficientStock {
                sku: p.sku.clone(),
                available: p.stock,
                requested: item.quantity,
            }));
        }

        products.push(p);
    }

    // Step 2: build the sale with prices frozen at this instant.
    let sale_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let sale_items: Vec<SaleItem> = items
        .iter()
        .zip(&products)
        .map(|(item, p)| SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.clone(),
            product_id: p.id.clone(),
            name_snapshot: p.name.clone(),
            quantity: item.quantity,
            unit_price_cents: p.price_cents,
            line_total_cents: ledger::line_total(p.price(), item.quantity).cents(),
        })
        .collect();

    let total: Money = ledger::sale_total(&sale_items);

    let sale = Sale {
        id: sale_id.clone(),
        client_id: client.id.clone(),
        total_cents: total.cents(),
        created_at: now,
    };

    // Step 3: persist sale + items.
    sqlx::query(
        "INSERT INTO sales (id, client_id, total_cents, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&sale.id)
    .bind(&sale.client_id)
    .bind(sale.total_cents)
    .bind(sale.created_at)
    .execute(&mut *conn)
    .await?;

    for item in &sale_items {
        sqlx::query(
            r#"
            INSERT INTO sale_items
                (id, sale_id, product_id, name_snapshot, quantity,
                 unit_price_cents, line_total_cents)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(&item.name_snapshot)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.line_total_cents)
        .execute(&mut *conn)
        .await?;
    }

    // Step 4: deduct stock through the ledger. The guarded decrement is
    // the authoritative availability check; the step-1 read only shapes
    // the error message for the common case.
    for (item, p) in items.iter().zip(&products) {
        stock::apply_exit(conn, p, item.quantity, Some(&sale_id), Some(&client.id)).await?;
    }

    // Step 5: one debit for the whole sale.
    account::insert_purchase(conn, &client.id, total, &sale_id, now).await?;

    Ok((sale, sale_items))
}
