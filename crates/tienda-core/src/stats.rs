//! # Sales Statistics
//!
//! Summary metrics derived from the catalog and the sales ledger.
//!
//! [`compute_statistics`] is a pure function of its inputs: the same
//! products, sales and line items always produce the same snapshot.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Sale, SaleItem};

/// Units sold for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub product_id: i64,
    /// Current product name; `None` if the product row is missing.
    pub name: Option<String>,
    pub units_sold: i64,
}

/// Point-in-time statistics over all recorded sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesStatistics {
    /// Sum of every sale's total, in cents.
    pub total_revenue_cents: i64,
    pub total_sales_count: i64,
    /// Units on hand across the whole catalog.
    pub total_stock: i64,
    /// Units sold across all line items.
    pub total_units_sold: i64,
    /// total_revenue / total_sales_count rounded half-up; 0 with no sales.
    pub average_sale_cents: i64,
    /// Product with the most units sold. Ties go to the lowest product id.
    pub best_selling_product: Option<ProductSales>,
    /// Units sold per product, most sold first (ties by ascending id).
    pub product_sales: Vec<ProductSales>,
}

/// Aggregates the catalog and ledger into a [`SalesStatistics`] snapshot.
///
/// ## Best Seller Tie-Break
/// ```text
/// product 4: 12 units ┐
/// product 2: 12 units ├─► best seller = product 2 (lowest id)
/// product 9:  3 units ┘
/// ```
pub fn compute_statistics(products: &[Product], sales: &[Sale], items: &[SaleItem]) -> SalesStatistics {
    let total_revenue: Money = sales.iter().map(Sale::total_revenue).sum();
    let total_sales_count = sales.len() as i64;
    let total_stock = products.iter().map(|p| p.stock).sum();

    // BTreeMap iterates by ascending product id
    let mut units_by_product: BTreeMap<i64, i64> = BTreeMap::new();
    for item in items {
        *units_by_product.entry(item.product_id).or_default() += item.quantity;
    }
    let total_units_sold = units_by_product.values().sum();

    let names: HashMap<i64, &str> = products.iter().map(|p| (p.id, p.name.as_str())).collect();

    let mut product_sales: Vec<ProductSales> = units_by_product
        .into_iter()
        .map(|(product_id, units_sold)| ProductSales {
            product_id,
            name: names.get(&product_id).map(|name| name.to_string()),
            units_sold,
        })
        .collect();
    // Stable sort keeps ascending ids within equal unit counts
    product_sales.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));

    SalesStatistics {
        total_revenue_cents: total_revenue.cents(),
        total_sales_count,
        total_stock,
        total_units_sold,
        average_sale_cents: total_revenue.average_over(total_sales_count).cents(),
        best_selling_product: product_sales.first().cloned(),
        product_sales,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn product(id: i64, name: &str, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            base_price_cents: 1000,
            stock,
            min_reorder_stock: 0,
            category_id: None,
        }
    }

    fn sale(id: i64, total_cents: i64) -> Sale {
        Sale {
            id,
            sold_at: Utc::now(),
            total_revenue_cents: total_cents,
            items: Vec::new(),
        }
    }

    fn item(id: i64, sale_id: i64, product_id: i64, quantity: i64) -> SaleItem {
        SaleItem {
            id,
            sale_id,
            product_id,
            quantity,
            unit_price_cents: 1000,
            subtotal_cents: 1000 * quantity,
        }
    }

    #[test]
    fn test_empty_ledger_has_zero_average() {
        let products = vec![product(1, "Cuaderno", 25), product(2, "Lápiz", 40)];
        let stats = compute_statistics(&products, &[], &[]);

        assert_eq!(stats.total_revenue_cents, 0);
        assert_eq!(stats.total_sales_count, 0);
        assert_eq!(stats.average_sale_cents, 0);
        assert_eq!(stats.total_stock, 65);
        assert_eq!(stats.total_units_sold, 0);
        assert!(stats.best_selling_product.is_none());
        assert!(stats.product_sales.is_empty());
    }

    #[test]
    fn test_revenue_and_average() {
        let products = vec![product(1, "Cuaderno", 10)];
        let sales = vec![sale(1, 1000), sale(2, 1000), sale(3, 0)];
        let stats = compute_statistics(&products, &sales, &[]);

        assert_eq!(stats.total_revenue_cents, 2000);
        assert_eq!(stats.total_sales_count, 3);
        // 20.00 / 3 = 6.666… → 6.67
        assert_eq!(stats.average_sale_cents, 667);
    }

    #[test]
    fn test_best_seller_sums_quantities_across_sales() {
        let products = vec![product(1, "Cuaderno", 10), product(2, "Lápiz", 10)];
        let sales = vec![sale(1, 0), sale(2, 0), sale(3, 0)];
        let items = vec![item(1, 1, 1, 4), item(2, 2, 2, 3), item(3, 3, 2, 2)];

        let stats = compute_statistics(&products, &sales, &items);
        let best = stats.best_selling_product.unwrap();

        assert_eq!(best.product_id, 2);
        assert_eq!(best.name.as_deref(), Some("Lápiz"));
        assert_eq!(best.units_sold, 5);
        assert_eq!(stats.total_units_sold, 9);
    }

    #[test]
    fn test_best_seller_tie_goes_to_lowest_id() {
        let products = vec![product(4, "Goma", 1), product(2, "Lápiz", 1), product(9, "Regla", 1)];
        let sales = vec![sale(1, 0)];
        let items = vec![item(1, 1, 4, 12), item(2, 1, 9, 3), item(3, 1, 2, 12)];

        let stats = compute_statistics(&products, &sales, &items);

        assert_eq!(stats.best_selling_product.unwrap().product_id, 2);
        let order: Vec<i64> = stats.product_sales.iter().map(|p| p.product_id).collect();
        assert_eq!(order, vec![2, 4, 9]);
    }

    #[test]
    fn test_statistics_are_idempotent() {
        let products = vec![product(1, "Cuaderno", 10), product(2, "Lápiz", 3)];
        let sales = vec![sale(1, 11_600), sale(2, 350)];
        let items = vec![item(1, 1, 1, 1), item(2, 2, 2, 1)];

        let first = compute_statistics(&products, &sales, &items);
        let second = compute_statistics(&products, &sales, &items);
        assert_eq!(first, second);
    }
}
