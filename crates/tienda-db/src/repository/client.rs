//! # Client Repository
//!
//! Database operations for clients.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::escape_like;
use tienda_core::Client;

const CLIENT_COLUMNS: &str = r#"
    id, document_type, document_number, first_names, last_names,
    address, phone, email, active, registered_at
"#;

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists all active clients, ordered by first names.
    pub async fn list_active(&self) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE active = 1
            ORDER BY first_names
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Gets a client by id, regardless of its active flag.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Case-insensitive substring search across first and last names.
    pub async fn search(&self, name: &str) -> DbResult<Vec<Client>> {
        let pattern = format!("%{}%", escape_like(name));

        let clients = sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE (first_names LIKE ?1 ESCAPE '\' OR last_names LIKE ?1 ESCAPE '\')
              AND active = 1
            ORDER BY first_names
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Inserts a new client; the row is created active and the registration
    /// timestamp is assigned here, not taken from the entity. Returns the
    /// newly assigned id.
    pub async fn insert(&self, client: &Client) -> DbResult<i64> {
        debug!(document = %client.document_number, "Inserting client");

        let result = sqlx::query(
            r#"
            INSERT INTO clients (
                document_type, document_number, first_names, last_names,
                address, phone, email, active, registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)
            "#,
        )
        .bind(client.document_type)
        .bind(&client.document_number)
        .bind(&client.first_names)
        .bind(&client.last_names)
        .bind(&client.address)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites all mutable fields, keyed by id. The active flag and
    /// registration timestamp are not touched. Returns whether exactly one
    /// row was affected.
    pub async fn update(&self, client: &Client) -> DbResult<bool> {
        debug!(id = client.id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                document_type = ?2,
                document_number = ?3,
                first_names = ?4,
                last_names = ?5,
                address = ?6,
                phone = ?7,
                email = ?8
            WHERE id = ?1
            "#,
        )
        .bind(client.id)
        .bind(client.document_type)
        .bind(&client.document_number)
        .bind(&client.first_names)
        .bind(&client.last_names)
        .bind(&client.address)
        .bind(&client.phone)
        .bind(&client.email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Soft delete: clears the active flag so historical sales keep a
    /// resolvable client reference.
    pub async fn deactivate(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deactivating client");

        let result = sqlx::query("UPDATE clients SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
