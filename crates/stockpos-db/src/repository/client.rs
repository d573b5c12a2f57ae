//! # Client Repository
//!
//! Database operations for clients.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockpos_core::{validation, Client};

/// Repository for client operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists all clients, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, address, created_at
            FROM clients
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Gets a client by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Inserts a new client. Only the name is required.
    pub async fn insert(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<Client> {
        validation::validate_name(name)?;

        debug!(name = %name, "Inserting client");

        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            address: address.map(str::to_string),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, phone, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    /// Hard-deletes a client.
    ///
    /// Account and stock history referencing this client keeps the dangling
    /// id; enrichment shows an absent marker.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }
}

/// Fetches a client on an explicit connection (used inside the checkout
/// transaction).
pub(crate) async fn fetch_by_id(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, email, phone, address, created_at
        FROM clients
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(client)
}
