//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! Note what is NOT here: no stock mutation. After the initial insert,
//! `products.stock` is written only by the stock ledger
//! (see [`crate::repository::stock`]).

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockpos_core::{validation, Product};

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let product = repo
///     .insert("Coca-Cola 330ml", "COKE-330", 150, 24, None)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, price_cents, stock, category_id, created_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, price_cents, stock, category_id, created_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// `stock` here is the opening stock level; every later change goes
    /// through the stock ledger.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(DbError::Domain)` - Invalid name/sku/price/stock
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(
        &self,
        name: &str,
        sku: &str,
        price_cents: i64,
        stock: i64,
        category_id: Option<&str>,
    ) -> DbResult<Product> {
        validation::validate_name(name)?;
        validation::validate_sku(sku)?;
        validation::validate_price_cents(price_cents)?;
        validation::validate_stock(stock)?;

        debug!(sku = %sku, "Inserting product");

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            sku: sku.trim().to_string(),
            price_cents,
            stock,
            category_id: category_id.map(str::to_string),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO products (id, name, sku, price_cents, stock, category_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category_id)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            // Name the duplicate SKU instead of the raw constraint message.
            DbError::UniqueViolation { .. } => DbError::duplicate("sku", sku),
            other => other,
        })?;

        Ok(product)
    }

    /// Hard-deletes a product.
    ///
    /// Ledger history referencing this product keeps its dangling id;
    /// read-side enrichment shows an explicit absent marker instead.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Fetches a product on an explicit connection.
///
/// Used by the checkout and stock-ledger transactions so the read happens
/// inside the same transaction as the subsequent writes.
pub(crate) async fn fetch_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, sku, price_cents, stock, category_id, created_at
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(product)
}
