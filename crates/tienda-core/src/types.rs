//! # Domain Types
//!
//! Core domain types used throughout Tienda Inventory.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    Product      │◄──│   SaleItem      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  sale_id (FK)   │       │
//! │  │  name           │   │  base_price     │   │  product_id(FK) │       │
//! │  │  tax_rate_bps   │   │  stock          │   │  unit_price     │       │
//! │  └─────────────────┘   │  min_reorder    │   │  subtotal       │       │
//! │                        │  category_id    │   └────────┬────────┘       │
//! │                        └────────▲────────┘            │ N:1            │
//! │                                 │              ┌──────▼──────────┐     │
//! │                        ┌────────┴────────┐     │      Sale       │     │
//! │                        │ ReorderRecord   │     │  ─────────────  │     │
//! │                        │  quantity       │     │  sold_at        │     │
//! │                        │  status         │     │  total_revenue  │     │
//! │                        └─────────────────┘     └─────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Relationships are plain foreign-key ids. Nothing here owns a database
//! handle; loading and cascading are explicit steps in `tienda-db`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so a percentage with two decimals
/// (16.00%) is stored exactly as an integer (1600).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category carrying the tax rate applied to its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Tax rate in basis points (1600 = 16.00%).
    pub tax_rate_bps: u32,
}

impl Category {
    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

/// Category as submitted for saving. `id: None` creates a new category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryDraft {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub tax_rate_bps: u32,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Price before tax, in cents.
    pub base_price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Stock level at or below which a sale triggers a reorder.
    pub min_reorder_stock: i64,

    /// Category supplying the tax rate; untaxed when absent.
    pub category_id: Option<i64>,
}

impl Product {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// Checks if `quantity` units can be taken from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    /// Whether a stock level has reached the reorder threshold.
    #[inline]
    pub fn needs_reorder_at(&self, stock: i64) -> bool {
        stock <= self.min_reorder_stock
    }
}

/// Product as submitted for saving. `id: None` creates a new product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub base_price_cents: i64,
    pub stock: i64,
    pub min_reorder_stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// A product together with its category and the price a customer pays.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductListing {
    pub product: Product,
    pub category: Option<Category>,
    /// Tax-inclusive unit price in cents.
    pub final_price_cents: i64,
}

impl ProductListing {
    /// Builds a listing, computing the tax-inclusive price.
    pub fn new(product: Product, category: Option<Category>) -> crate::CoreResult<Self> {
        let final_price_cents = crate::pricing::final_unit_price(&product, category.as_ref())?.cents();
        Ok(ProductListing {
            product,
            category,
            final_price_cents,
        })
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale (header). Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    /// Sum of the line items' subtotals, in cents.
    pub total_revenue_cents: i64,
    /// Line items; loaded separately from the header row.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// Returns the total revenue as Money.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }

    /// Recomputes the total from the attached items.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(SaleItem::subtotal).sum()
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale. Prices are frozen at the moment of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    /// Quantity sold (> 0).
    pub quantity: i64,
    /// Tax-inclusive unit price charged, in cents.
    pub unit_price_cents: i64,
    /// unit_price × quantity, in cents.
    pub subtotal_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Reorders
// =============================================================================

/// Lifecycle of a replenishment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReorderStatus {
    /// Requested, goods not yet received.
    Pending,
    /// Goods received and added to stock.
    Completed,
}

impl Default for ReorderStatus {
    fn default() -> Self {
        ReorderStatus::Pending
    }
}

/// A replenishment request raised when stock reaches its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReorderRecord {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    #[ts(as = "String")]
    pub requested_at: DateTime<Utc>,
    pub status: ReorderStatus,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_reorder_stock: i64) -> Product {
        Product {
            id: 1,
            name: "Cuaderno".to_string(),
            base_price_cents: 10_000,
            stock,
            min_reorder_stock,
            category_id: None,
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1600);
        assert_eq!(rate.bps(), 1600);
        assert!((rate.percentage() - 16.0).abs() < 0.001);
        assert_eq!(TaxRate::default(), TaxRate::zero());
    }

    #[test]
    fn test_can_sell_up_to_stock() {
        let p = product(25, 20);
        assert!(p.can_sell(25));
        assert!(!p.can_sell(26));
    }

    #[test]
    fn test_reorder_threshold_is_inclusive() {
        let p = product(25, 20);
        assert!(p.needs_reorder_at(20));
        assert!(p.needs_reorder_at(15));
        assert!(!p.needs_reorder_at(21));
    }

    #[test]
    fn test_sale_items_total() {
        let sale = Sale {
            id: 1,
            sold_at: Utc::now(),
            total_revenue_cents: 1500,
            items: vec![
                SaleItem {
                    id: 1,
                    sale_id: 1,
                    product_id: 1,
                    quantity: 2,
                    unit_price_cents: 500,
                    subtotal_cents: 1000,
                },
                SaleItem {
                    id: 2,
                    sale_id: 1,
                    product_id: 2,
                    quantity: 1,
                    unit_price_cents: 500,
                    subtotal_cents: 500,
                },
            ],
        };
        assert_eq!(sale.items_total(), sale.total_revenue());
    }

    #[test]
    fn test_reorder_status_wire_format() {
        assert_eq!(ReorderStatus::default(), ReorderStatus::Pending);
        assert_eq!(
            serde_json::to_string(&ReorderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&ReorderStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn test_product_draft_defaults_optional_fields() {
        let draft: ProductDraft = serde_json::from_str(
            r#"{"name":"Lápiz","base_price_cents":350,"stock":40,"min_reorder_stock":10}"#,
        )
        .unwrap();
        assert_eq!(draft.id, None);
        assert_eq!(draft.category_id, None);
    }
}
