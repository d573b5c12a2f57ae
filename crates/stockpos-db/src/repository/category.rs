//! # Category Repository
//!
//! Database operations for product categories.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockpos_core::{validation, Category};

/// Repository for category operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain)` - Empty or over-long name
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, name: &str) -> DbResult<Category> {
        validation::validate_name(name)?;

        debug!(name = %name, "Inserting category");

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("nombre", name.trim()),
                other => other,
            })?;

        Ok(category)
    }

    /// Hard-deletes a category.
    ///
    /// Products referencing it fall back to "no category"
    /// (`ON DELETE SET NULL` in the schema).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}
