//! # Category Repository
//!
//! Database operations for product categories.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::escape_like;
use tienda_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all active categories, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, active
            FROM categories
            WHERE active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by id, regardless of its active flag.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, active
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Case-insensitive substring search on the category name.
    pub async fn search(&self, name: &str) -> DbResult<Vec<Category>> {
        let pattern = format!("%{}%", escape_like(name));

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, active
            FROM categories
            WHERE active = 1 AND name LIKE ?1 ESCAPE '\'
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Inserts a new category; the row is created active. Returns the newly
    /// assigned id.
    pub async fn insert(&self, category: &Category) -> DbResult<i64> {
        debug!(name = %category.name, "Inserting category");

        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, description, active)
            VALUES (?1, ?2, 1)
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites name and description, keyed by id. Returns whether exactly
    /// one row was affected.
    pub async fn update(&self, category: &Category) -> DbResult<bool> {
        debug!(id = category.id, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                description = ?3
            WHERE id = ?1
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Soft delete: clears the active flag. Historical products keep a
    /// resolvable category reference.
    pub async fn deactivate(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deactivating category");

        let result = sqlx::query("UPDATE categories SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tienda_core::Category;

    async fn repo() -> CategoryRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .categories()
    }

    #[tokio::test]
    async fn test_insert_then_get_round_trip() {
        let repo = repo().await;

        let id = repo
            .insert(&Category::new("Beverages", Some("Cold drinks".to_string())))
            .await
            .unwrap();
        assert!(id > 0);

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Beverages");
        assert_eq!(found.description.as_deref(), Some("Cold drinks"));
        assert!(found.active);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let repo = repo().await;
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let repo = repo().await;
        repo.insert(&Category::new("Snacks", None)).await.unwrap();
        repo.insert(&Category::new("Beverages", None)).await.unwrap();

        let all = repo.list_active().await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Beverages", "Snacks"]);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_list_but_not_get() {
        let repo = repo().await;
        let id = repo.insert(&Category::new("Snacks", None)).await.unwrap();

        assert!(repo.deactivate(id).await.unwrap());

        // Excluded from the active listing...
        assert!(repo.list_active().await.unwrap().is_empty());

        // ...but still resolvable by id, with active = false
        let row = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(!row.active);

        // Deactivating a missing id affects no rows
        assert!(!repo.deactivate(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_returns_row_affected() {
        let repo = repo().await;
        let id = repo.insert(&Category::new("Snacks", None)).await.unwrap();

        let mut category = repo.get_by_id(id).await.unwrap().unwrap();
        category.name = "Savory Snacks".to_string();
        assert!(repo.update(&category).await.unwrap());

        category.id = 999;
        assert!(!repo.update(&category).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_is_substring_and_case_insensitive() {
        let repo = repo().await;
        repo.insert(&Category::new("Beverages", None)).await.unwrap();
        repo.insert(&Category::new("Snacks", None)).await.unwrap();

        let hits = repo.search("VERA").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Beverages");

        assert!(repo.search("xyz").await.unwrap().is_empty());
    }
}
