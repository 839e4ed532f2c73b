//! # Stock Report
//!
//! Read-only reporting view over the product catalogue: one row per active
//! product with its category name and a coarse stock level label.

use serde::Serialize;

use crate::error::DbResult;
use crate::repository::product::ProductRepository;
use tienda_core::Product;

/// Label shown when a product's category cannot be resolved.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One row of the stock report.
#[derive(Debug, Clone, Serialize)]
pub struct StockReportRow {
    pub product_id: i64,
    pub code: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    /// Coarse level label, see [`stock_status_label`].
    pub status: &'static str,
}

/// Maps a stock count to its report label.
///
/// - below 10 → `LOW STOCK`
/// - below 50 → `NORMAL`
/// - otherwise → `HIGH STOCK`
pub fn stock_status_label(stock: i64) -> &'static str {
    if stock < 10 {
        "LOW STOCK"
    } else if stock < 50 {
        "NORMAL"
    } else {
        "HIGH STOCK"
    }
}

/// Builds the stock report over all active products, ordered by category
/// name then product name. Products whose category cannot be resolved are
/// grouped under [`UNCATEGORIZED`].
pub async fn stock_report(products: &ProductRepository) -> DbResult<Vec<StockReportRow>> {
    let catalogue = products.list_active().await?;

    let mut rows: Vec<StockReportRow> = catalogue.iter().map(row_for).collect();
    rows.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));

    Ok(rows)
}

fn row_for(product: &Product) -> StockReportRow {
    StockReportRow {
        product_id: product.id,
        code: product.code.clone(),
        name: product.name.clone(),
        category: product
            .category_name
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        price_cents: product.sale_price_cents,
        stock: product.stock,
        status: stock_status_label(product.stock),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
