//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! A sale is two tables: the `sales` header row and its `sale_lines`. The
//! entity's `lines` field is not a column; reads that need the lines load
//! them in a second query, and [`SaleRepository::insert_with_lines`] writes
//! them one statement at a time after the header.
//!
//! Deleting a sale is a hard delete ([`SaleRepository::purge`]); the schema
//! cascades the removal to its lines.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use tienda_core::{Sale, SaleLine, SaleStatus};

const SALE_COLUMNS: &str = r#"
    id, sale_number, client_id, user_id, sold_at,
    subtotal_cents, tax_cents, total_cents, status
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales regardless of status, newest first. Lines are not
    /// loaded; use [`SaleRepository::get_by_id`] for a full sale.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            ORDER BY sold_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists sales with the given status, newest first. Lines are not loaded.
    pub async fn list_by_status(&self, status: SaleStatus) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE status = ?1
            ORDER BY sold_at DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale by id with its lines fully loaded, in line-id order.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match sale {
            Some(mut sale) => {
                sale.lines = self.lines_for(id).await?;
                Ok(Some(sale))
            }
            None => Ok(None),
        }
    }

    /// Loads the line items of a sale, in insertion (id) order.
    pub async fn lines_for(&self, sale_id: i64) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Inserts the sale header only. Lines are not written; the entity's
    /// `lines` field is ignored here. Returns the newly assigned id.
    pub async fn insert(&self, sale: &Sale) -> DbResult<i64> {
        debug!(client_id = sale.client_id, "Inserting sale header");

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                sale_number, client_id, user_id, sold_at,
                subtotal_cents, tax_cents, total_cents, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale.sale_number)
        .bind(sale.client_id)
        .bind(sale.user_id)
        .bind(sale.sold_at)
        .bind(sale.subtotal_cents)
        .bind(sale.tax_cents)
        .bind(sale.total_cents)
        .bind(sale.status)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts a single line item. `line.sale_id` must reference an existing
    /// sale. Returns the newly assigned line id.
    pub async fn insert_line(&self, line: &SaleLine) -> DbResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO sale_lines (
                sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(line.sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.subtotal_cents)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Registers a complete sale: recomputes the totals, inserts the header,
    /// generates the sale number from the assigned id, then writes each line.
    ///
    /// The header and lines are separate statements, not a transaction: a
    /// crash mid-way leaves a header with fewer lines than intended. The
    /// entity is updated in place (id, sale number, totals, line sale_ids and
    /// ids). Returns the sale id.
    pub async fn insert_with_lines(&self, sale: &mut Sale) -> DbResult<i64> {
        sale.recompute_totals();

        let id = self.insert(sale).await?;
        sale.id = id;

        // The number embeds the id, so it can only be generated after the
        // header insert; written back in a second statement.
        sale.generate_sale_number();
        sqlx::query("UPDATE sales SET sale_number = ?2 WHERE id = ?1")
            .bind(id)
            .bind(&sale.sale_number)
            .execute(&self.pool)
            .await?;

        for line in &mut sale.lines {
            line.sale_id = id;
            line.id = self.insert_line(line).await?;
        }

        info!(
            id,
            sale_number = %sale.sale_number,
            total_cents = sale.total_cents,
            lines = sale.lines.len(),
            "Sale registered"
        );

        Ok(id)
    }

    /// Overwrites all header fields, keyed by id. Lines are not touched.
    /// Returns whether exactly one row was affected.
    pub async fn update(&self, sale: &Sale) -> DbResult<bool> {
        debug!(id = sale.id, status = sale.status.as_str(), "Updating sale");

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                sale_number = ?2,
                client_id = ?3,
                user_id = ?4,
                sold_at = ?5,
                subtotal_cents = ?6,
                tax_cents = ?7,
                total_cents = ?8,
                status = ?9
            WHERE id = ?1
            "#,
        )
        .bind(sale.id)
        .bind(&sale.sale_number)
        .bind(sale.client_id)
        .bind(sale.user_id)
        .bind(sale.sold_at)
        .bind(sale.subtotal_cents)
        .bind(sale.tax_cents)
        .bind(sale.total_cents)
        .bind(sale.status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Sets the status of a sale without touching the other header fields.
    pub async fn set_status(&self, id: i64, status: SaleStatus) -> DbResult<bool> {
        debug!(id, status = status.as_str(), "Setting sale status");

        let result = sqlx::query("UPDATE sales SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Hard delete: removes the sale row, cascading to its lines. Sales have
    /// no active flag. Returns whether exactly one row was affected.
    pub async fn purge(&self, id: i64) -> DbResult<bool> {
        info!(id, "Purging sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
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
    use chrono::{Duration, Utc};
    use tienda_core::{Client, DocumentType, User};

    /// Seeds the client and user the sale foreign keys need; returns
    /// (client_id, user_id).
    async fn seed_refs(db: &Database) -> (i64, i64) {
        let client_id = db
            .clients()
            .insert(&Client {
                id: 0,
                document_type: DocumentType::NationalId,
                document_number: "12345678".to_string(),
                first_names: "Maria".to_string(),
                last_names: "Quispe".to_string(),
                address: None,
                phone: None,
                email: None,
                active: true,
                registered_at: Utc::now(),
            })
            .await
            .unwrap();

        let user_id = db
            .users()
            .insert(&User {
                id: 0,
                username: "jperez".to_string(),
                password: "secret".to_string(),
                first_names: "Juan".to_string(),
                last_names: "Perez".to_string(),
                email: None,
                is_admin: false,
                active: true,
                registered_at: Utc::now(),
            })
            .await
            .unwrap();

        (client_id, user_id)
    }

    fn line(product_id: i64, quantity: i64, unit_price_cents: i64) -> SaleLine {
        let mut line = SaleLine {
            id: 0,
            sale_id: 0,
            product_id,
            quantity,
            unit_price_cents,
            subtotal_cents: 0,
        };
        line.recompute_subtotal();
        line
    }

    /// Seeds a category and product so sale lines have a valid product
    /// reference; returns the product id.
    async fn seed_product(db: &Database) -> i64 {
        let category_id = db
            .categories()
            .insert(&tienda_core::Category::new("Electronics", None))
            .await
            .unwrap();

        db.products()
            .insert(&tienda_core::Product {
                code: "LAP-001".to_string(),
                name: "Laptop X1".to_string(),
                category_id,
                sale_price_cents: 1000,
                stock: 100,
                ..tienda_core::Product::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_with_lines_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (client_id, user_id) = seed_refs(&db).await;
        let product_id = seed_product(&db).await;
        let repo = db.sales();

        let mut sale = Sale {
            client_id,
            user_id,
            lines: vec![line(product_id, 2, 1000), line(product_id, 1, 500)],
            ..Sale::default()
        };

        let id = repo.insert_with_lines(&mut sale).await.unwrap();
        assert!(id > 0);
        assert_eq!(sale.id, id);
        assert!(sale.sale_number.ends_with(&format!("{id:06}")));

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.subtotal_cents, 2500);
        assert_eq!(found.tax_cents, 325);
        assert_eq!(found.total_cents, 2825);
        assert_eq!(found.status, SaleStatus::Pending);
        assert_eq!(found.lines.len(), 2);
        assert_eq!(found.lines[0].quantity, 2);
        assert_eq!(found.lines[1].subtotal_cents, 500);
        assert_eq!(found.sale_number, sale.sale_number);
    }

    #[tokio::test]
    async fn test_list_all_includes_every_status_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (client_id, user_id) = seed_refs(&db).await;
        let repo = db.sales();

        for (days_ago, status) in [
            (2, SaleStatus::Completed),
            (1, SaleStatus::Voided),
            (0, SaleStatus::Pending),
        ] {
            repo.insert(&Sale {
                client_id,
                user_id,
                sold_at: Utc::now() - Duration::days(days_ago),
                status,
                ..Sale::default()
            })
            .await
            .unwrap();
        }

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        let statuses: Vec<SaleStatus> = all.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                SaleStatus::Pending,
                SaleStatus::Voided,
                SaleStatus::Completed
            ]
        );

        let completed = repo.list_by_status(SaleStatus::Completed).await.unwrap();
        assert_eq!(completed.len(), 1);
    }

    #[tokio::test]
    async fn test_set_status_and_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (client_id, user_id) = seed_refs(&db).await;
        let repo = db.sales();

        let id = repo
            .insert(&Sale {
                client_id,
                user_id,
                ..Sale::default()
            })
            .await
            .unwrap();

        assert!(repo.set_status(id, SaleStatus::Completed).await.unwrap());
        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().status,
            SaleStatus::Completed
        );
        assert!(!repo.set_status(999, SaleStatus::Voided).await.unwrap());

        let mut sale = repo.get_by_id(id).await.unwrap().unwrap();
        sale.total_cents = 5000;
        assert!(repo.update(&sale).await.unwrap());
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().total_cents, 5000);
    }

    #[tokio::test]
    async fn test_purge_cascades_to_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (client_id, user_id) = seed_refs(&db).await;
        let product_id = seed_product(&db).await;
        let repo = db.sales();

        let mut sale = Sale {
            client_id,
            user_id,
            lines: vec![line(product_id, 1, 1000)],
            ..Sale::default()
        };
        let id = repo.insert_with_lines(&mut sale).await.unwrap();
        assert_eq!(repo.lines_for(id).await.unwrap().len(), 1);

        assert!(repo.purge(id).await.unwrap());
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(repo.lines_for(id).await.unwrap().is_empty());

        assert!(!repo.purge(id).await.unwrap());
    }
}
