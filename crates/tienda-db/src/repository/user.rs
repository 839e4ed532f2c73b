//! # User Repository
//!
//! Database operations for system users (cashiers and administrators).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::escape_like;
use tienda_core::User;

const USER_COLUMNS: &str = r#"
    id, username, password, first_names, last_names,
    email, is_admin, active, registered_at
"#;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists all active users, ordered by username.
    pub async fn list_active(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE active = 1
            ORDER BY username
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Gets a user by id, regardless of its active flag.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks up a user by exact username, regardless of the active flag.
    /// Sign-in flows must check `active` themselves after the lookup.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = ?1
            "#
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Case-insensitive substring search across first and last names.
    pub async fn search(&self, name: &str) -> DbResult<Vec<User>> {
        let pattern = format!("%{}%", escape_like(name));

        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE (first_names LIKE ?1 ESCAPE '\' OR last_names LIKE ?1 ESCAPE '\')
              AND active = 1
            ORDER BY username
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Inserts a new user; the row is created active and the registration
    /// timestamp is assigned here. Returns the newly assigned id.
    pub async fn insert(&self, user: &User) -> DbResult<i64> {
        debug!(username = %user.username, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                username, password, first_names, last_names,
                email, is_admin, active, registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.first_names)
        .bind(&user.last_names)
        .bind(&user.email)
        .bind(user.is_admin)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites all mutable fields, keyed by id. The active flag and
    /// registration timestamp are not touched. Returns whether exactly one
    /// row was affected.
    pub async fn update(&self, user: &User) -> DbResult<bool> {
        debug!(id = user.id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = ?2,
                password = ?3,
                first_names = ?4,
                last_names = ?5,
                email = ?6,
                is_admin = ?7
            WHERE id = ?1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.first_names)
        .bind(&user.last_names)
        .bind(&user.email)
        .bind(user.is_admin)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Soft delete: clears the active flag so historical sales keep a
    /// resolvable cashier reference.
    pub async fn deactivate(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deactivating user");

        let result = sqlx::query("UPDATE users SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
