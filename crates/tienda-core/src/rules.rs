//! # Derived Business Rules
//!
//! Stateless functions computing aggregates over entities and entity
//! collections: lifetime value, order averages, restock checks, discounts,
//! commissions and period totals.
//!
//! ## Design Principles
//! - No I/O: callers load the entities (a client's sales, a product list)
//!   through the repositories and pass them in by reference.
//! - Read-only: nothing here mutates its arguments.
//! - Explicit rejection: out-of-range inputs fail, they are never clamped.
//!
//! Monetary aggregates consider **Completed** sales only; Pending and Voided
//! sales never contribute to client metrics or period totals.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Rate};
use crate::types::{Product, Sale, SaleStatus};
use crate::{DEFAULT_COMMISSION_BPS, FREQUENT_CLIENT_MIN_PURCHASES};

// =============================================================================
// Client Metrics
// =============================================================================

/// Total amount a client has spent across Completed sales.
pub fn client_lifetime_value(sales: &[Sale]) -> Money {
    sales
        .iter()
        .filter(|s| s.status == SaleStatus::Completed)
        .map(Sale::total)
        .sum()
}

/// Mean total of a client's Completed sales; zero when there are none.
pub fn average_order_value(sales: &[Sale]) -> Money {
    let completed: Vec<&Sale> = sales
        .iter()
        .filter(|s| s.status == SaleStatus::Completed)
        .collect();

    if completed.is_empty() {
        return Money::zero();
    }

    let total: Money = completed.iter().map(|s| s.total()).sum();
    Money::from_cents(total.cents() / completed.len() as i64)
}

/// Whether a client counts as frequent: at least `min_purchases` Completed
/// sales. Pass [`FREQUENT_CLIENT_MIN_PURCHASES`] for the default threshold.
pub fn is_frequent_client(sales: &[Sale], min_purchases: usize) -> bool {
    sales
        .iter()
        .filter(|s| s.status == SaleStatus::Completed)
        .count()
        >= min_purchases
}

/// Frequent-client check with the default threshold.
pub fn is_frequent_client_default(sales: &[Sale]) -> bool {
    is_frequent_client(sales, FREQUENT_CLIENT_MIN_PURCHASES)
}

// =============================================================================
// Product Rules
// =============================================================================

/// Whether current stock covers the requested quantity.
pub fn has_sufficient_stock(product: &Product, quantity: i64) -> bool {
    product.stock >= quantity
}

/// Whether the product needs restocking (stock at or below the minimum).
pub fn needs_restock(product: &Product) -> bool {
    product.stock <= product.minimum_stock
}

/// Profit locked up in current stock: unit profit × stock level.
pub fn potential_profit(product: &Product) -> Money {
    product.profit().multiply_quantity(product.stock)
}

/// Total potential profit over a product collection.
pub fn total_potential_profit(products: &[Product]) -> Money {
    products.iter().map(potential_profit).sum()
}

/// Sale price after applying a percentage discount.
///
/// Fails with [`CoreError::InvalidDiscount`] when the rate exceeds 100%
/// (10000 bps). The basis-point domain makes negative discounts
/// unrepresentable, so the [0, 100] percent contract holds by construction
/// on the low side and by this check on the high side. Never clamps.
pub fn discounted_price(product: &Product, discount: Rate) -> CoreResult<Money> {
    if discount.bps() > 10_000 {
        return Err(CoreError::InvalidDiscount {
            bps: discount.bps(),
        });
    }

    let price = product.sale_price();
    Ok(price - price.apply_rate(discount))
}

// =============================================================================
// Sale Rules
// =============================================================================

/// Cashier commission for a sale at the given rate.
pub fn commission(sale: &Sale, rate: Rate) -> Money {
    sale.total().apply_rate(rate)
}

/// Commission at the default 5% rate.
pub fn commission_default(sale: &Sale) -> Money {
    commission(sale, Rate::from_bps(DEFAULT_COMMISSION_BPS))
}

/// Date-range helpers over sale collections.
pub trait SalesSliceExt {
    /// Sales whose calendar date falls within `[start, end]` (inclusive on
    /// both ends, compared by date, not instant). Status is not filtered.
    fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Sale>;

    /// Sum of Completed sale totals within the date range.
    fn total_in_period(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Money;
}

impl SalesSliceExt for [Sale] {
    fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Sale> {
        self.iter()
            .filter(|s| {
                let date = s.sold_at.date_naive();
                date >= start.date_naive() && date <= end.date_naive()
            })
            .collect()
    }

    fn total_in_period(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Money {
        self.between(start, end)
            .into_iter()
            .filter(|s| s.status == SaleStatus::Completed)
            .map(|s| s.total())
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sale(status: SaleStatus, total_cents: i64, days_ago: i64) -> Sale {
        Sale {
            status,
            total_cents,
            sold_at: Utc::now() - Duration::days(days_ago),
            ..Sale::default()
        }
    }

    #[test]
    fn test_client_lifetime_value_completed_only() {
        let sales = vec![
            sale(SaleStatus::Completed, 1000, 1),
            sale(SaleStatus::Completed, 2500, 2),
            sale(SaleStatus::Pending, 9999, 0),
            sale(SaleStatus::Voided, 5000, 3),
        ];

        assert_eq!(client_lifetime_value(&sales).cents(), 3500);
    }

    #[test]
    fn test_average_order_value() {
        let sales = vec![
            sale(SaleStatus::Completed, 1000, 1),
            sale(SaleStatus::Completed, 3000, 2),
            sale(SaleStatus::Voided, 100_000, 1),
        ];

        assert_eq!(average_order_value(&sales).cents(), 2000);
        assert_eq!(average_order_value(&[]).cents(), 0);
    }

    #[test]
    fn test_is_frequent_client_threshold() {
        let mut sales: Vec<Sale> = (0..4)
            .map(|i| sale(SaleStatus::Completed, 100, i))
            .collect();
        sales.push(sale(SaleStatus::Pending, 100, 0));

        // 4 completed + 1 pending is below the default threshold of 5
        assert!(!is_frequent_client_default(&sales));

        sales.push(sale(SaleStatus::Completed, 100, 5));
        assert!(is_frequent_client_default(&sales));

        assert!(is_frequent_client(&sales, 3));
        assert!(!is_frequent_client(&sales, 10));
    }

    fn product(stock: i64, minimum: i64, purchase: i64, sale_price: i64) -> Product {
        Product {
            code: "P-1".to_string(),
            purchase_price_cents: purchase,
            sale_price_cents: sale_price,
            stock,
            minimum_stock: minimum,
            ..Product::default()
        }
    }

    #[test]
    fn test_stock_rules() {
        let p = product(10, 5, 100, 150);
        assert!(has_sufficient_stock(&p, 10));
        assert!(!has_sufficient_stock(&p, 11));
        assert!(!needs_restock(&p));
        assert!(needs_restock(&product(5, 5, 100, 150)));
    }

    #[test]
    fn test_potential_profit() {
        let p = product(10, 5, 100, 150);
        assert_eq!(potential_profit(&p).cents(), 500);

        let products = vec![p, product(4, 5, 200, 300)];
        assert_eq!(total_potential_profit(&products).cents(), 900);
    }

    #[test]
    fn test_discounted_price() {
        let p = product(1, 5, 100, 10_000); // sells at $100.00

        let discounted = discounted_price(&p, Rate::from_bps(1000)).unwrap();
        assert_eq!(discounted.cents(), 9000); // 10% off

        // 0% and 100% are both valid boundaries
        assert_eq!(
            discounted_price(&p, Rate::zero()).unwrap().cents(),
            10_000
        );
        assert_eq!(
            discounted_price(&p, Rate::from_bps(10_000)).unwrap().cents(),
            0
        );

        let err = discounted_price(&p, Rate::from_bps(10_001)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDiscount { bps: 10_001 }));
    }

    #[test]
    fn test_commission() {
        let s = sale(SaleStatus::Completed, 10_000, 0);
        assert_eq!(commission_default(&s).cents(), 500); // 5% of $100.00
        assert_eq!(commission(&s, Rate::from_bps(1000)).cents(), 1000);
    }

    #[test]
    fn test_between_is_date_inclusive() {
        let sales = vec![
            sale(SaleStatus::Completed, 100, 0),
            sale(SaleStatus::Completed, 200, 5),
            sale(SaleStatus::Completed, 400, 30),
        ];

        let start = Utc::now() - Duration::days(5);
        let end = Utc::now();
        let in_range = sales.between(start, end);
        assert_eq!(in_range.len(), 2);
    }

    #[test]
    fn test_total_in_period_completed_only() {
        let sales = vec![
            sale(SaleStatus::Completed, 100, 1),
            sale(SaleStatus::Pending, 200, 1),
            sale(SaleStatus::Voided, 400, 2),
            sale(SaleStatus::Completed, 800, 40),
        ];

        let start = Utc::now() - Duration::days(7);
        let end = Utc::now();
        assert_eq!(sales.total_in_period(start, end).cents(), 100);
    }
}
