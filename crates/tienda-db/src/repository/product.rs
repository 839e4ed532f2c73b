//! # Product Repository
//!
//! Database operations for the product catalogue. Every read joins the
//! categories table so `category_name` is populated on the way out; writes
//! only ever touch the products table.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::escape_like;
use tienda_core::Product;

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.code, p.name, p.description, p.category_id,
    c.name AS category_name,
    p.purchase_price_cents, p.sale_price_cents,
    p.stock, p.minimum_stock, p.active, p.registered_at
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all active products with their category names, ordered by
    /// product name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.active = 1
            ORDER BY p.name
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by id, regardless of its active flag.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its unique business code, regardless of its active
    /// flag. Exact match, not a substring search.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.code = ?1
            "#
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Case-insensitive substring search on the product name.
    pub async fn search(&self, name: &str) -> DbResult<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(name));

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.active = 1 AND p.name LIKE ?1 ESCAPE '\'
            ORDER BY p.name
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product; the row is created active and the registration
    /// timestamp is assigned here. `category_name` is derived, never written.
    /// Returns the newly assigned id.
    pub async fn insert(&self, product: &Product) -> DbResult<i64> {
        debug!(code = %product.code, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                code, name, description, category_id,
                purchase_price_cents, sale_price_cents,
                stock, minimum_stock, active, registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9)
            "#,
        )
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.purchase_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.stock)
        .bind(product.minimum_stock)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites all mutable fields, keyed by id. The active flag and
    /// registration timestamp are not touched. Returns whether exactly one
    /// row was affected.
    pub async fn update(&self, product: &Product) -> DbResult<bool> {
        debug!(id = product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                code = ?2,
                name = ?3,
                description = ?4,
                category_id = ?5,
                purchase_price_cents = ?6,
                sale_price_cents = ?7,
                stock = ?8,
                minimum_stock = ?9
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.purchase_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.stock)
        .bind(product.minimum_stock)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Soft delete: clears the active flag. Sale lines keep a resolvable
    /// product reference.
    pub async fn deactivate(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deactivating product");

        let result = sqlx::query("UPDATE products SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Adjusts stock in place by `delta` (negative for sales, positive for
    /// restocking): `stock = stock + delta` in a single statement.
    ///
    /// This path does not guard against going negative; callers that need the
    /// guard go through [`Product::adjust_stock`] on a loaded entity and then
    /// [`ProductRepository::update`]. Returns whether exactly one row was
    /// affected.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> DbResult<bool> {
        debug!(id, delta, "Adjusting product stock");

        let result = sqlx::query("UPDATE products SET stock = stock + ?2 WHERE id = ?1")
            .bind(id)
            .bind(delta)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
