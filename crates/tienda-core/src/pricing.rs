//! # Pricing
//!
//! Tax-inclusive prices and the pure half of the sale workflow.
//!
//! ## Sale Quote
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleQuote::prepare(product, category, quantity)                        │
//! │                                                                         │
//! │   quantity <= 0 ?        ──► CoreError::InvalidQuantity                 │
//! │   quantity > stock ?     ──► CoreError::InsufficientStock               │
//! │   price × qty overflows? ──► CoreError::AmountOverflow                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   unit_price  = final_unit_price(product, category)                    │
//! │   subtotal    = unit_price × quantity                                  │
//! │   remaining   = stock - quantity                                       │
//! │   reorder?    = remaining <= min_reorder_stock                         │
//! │                                                                         │
//! │  tienda-db then writes exactly what the quote says, in one transaction │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Category, Product};

/// The price a customer pays for one unit of `product`.
///
/// Untaxed products (no category) sell at their base price. Otherwise the
/// category's rate is applied and the result rounded half-up to the cent.
/// Fails with [`CoreError::AmountOverflow`] if the taxed price leaves the i64
/// range.
///
/// ## Example
/// ```rust
/// use tienda_core::{final_unit_price, Category, Product};
///
/// let category = Category { id: 1, name: "Papelería".into(), tax_rate_bps: 1600 };
/// let product = Product {
///     id: 1,
///     name: "Cuaderno".into(),
///     base_price_cents: 10_000,
///     stock: 25,
///     min_reorder_stock: 20,
///     category_id: Some(1),
/// };
/// assert_eq!(final_unit_price(&product, Some(&category)).unwrap().cents(), 11_600);
/// assert_eq!(final_unit_price(&product, None).unwrap().cents(), 10_000);
/// ```
pub fn final_unit_price(product: &Product, category: Option<&Category>) -> CoreResult<Money> {
    match category {
        Some(category) => product
            .base_price()
            .with_tax_included(category.tax_rate())
            .ok_or(CoreError::AmountOverflow {
                product_id: product.id,
            }),
        None => Ok(product.base_price()),
    }
}

/// Everything a sale will write, computed before touching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleQuote {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    /// Stock left once the sale is applied.
    pub remaining_stock: i64,
    /// Whether the remaining stock reaches the reorder threshold.
    pub needs_reorder: bool,
}

impl SaleQuote {
    /// Validates a sale request against the product's current stock and
    /// prices it.
    ///
    /// `category` must be the product's own category (or `None` when the
    /// product has none).
    pub fn prepare(product: &Product, category: Option<&Category>, quantity: i64) -> CoreResult<Self> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
            });
        }

        if !product.can_sell(quantity) {
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                available: product.stock,
                requested: quantity,
            });
        }

        let unit_price = final_unit_price(product, category)?;
        let subtotal = unit_price.checked_mul(quantity).ok_or(CoreError::AmountOverflow {
            product_id: product.id,
        })?;
        let remaining_stock = product.stock - quantity;

        Ok(SaleQuote {
            product_id: product.id,
            quantity,
            unit_price,
            subtotal,
            remaining_stock,
            needs_reorder: product.needs_reorder_at(remaining_stock),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
