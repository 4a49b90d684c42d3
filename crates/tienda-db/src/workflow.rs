//! # Sale Workflow
//!
//! Records a single-product sale atomically.
//!
//! ## Transaction Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleWorkflow::sell(product_id, quantity)          BEGIN               │
//! │                                                                         │
//! │  1. fetch product             ── none ──► ProductNotFound              │
//! │  2. fetch its category        ── none ──► CategoryNotFound             │
//! │  3. SaleQuote::prepare        ── err  ──► InvalidQuantity /            │
//! │                                           InsufficientStock            │
//! │  4. INSERT sales (header)                                              │
//! │  5. INSERT sale_items                                                  │
//! │  6. guarded stock decrement   ── 0 rows ► InsufficientStock            │
//! │  7. INSERT reorders (20, PENDING) if remaining <= threshold            │
//! │                                                                         │
//! │                                                    COMMIT              │
//! │  Any error returns before COMMIT; dropping the transaction rolls       │
//! │  every write back.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::repository::{category, product, reorder, sale};
use tienda_core::{CoreError, Sale, SaleQuote, DEFAULT_REORDER_QUANTITY};

/// Why a sale did not go through.
#[derive(Debug, Error)]
pub enum SaleError {
    /// The request broke a business rule; nothing was written.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The store failed; the transaction was rolled back.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<sqlx::Error> for SaleError {
    fn from(err: sqlx::Error) -> Self {
        SaleError::Storage(DbError::from(err))
    }
}

/// Runs sales against the store, one transaction per sale.
#[derive(Debug, Clone)]
pub struct SaleWorkflow {
    pool: SqlitePool,
}

impl SaleWorkflow {
    /// Creates a new SaleWorkflow.
    pub fn new(pool: SqlitePool) -> Self {
        SaleWorkflow { pool }
    }

    /// Sells `quantity` units of a product.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The committed sale with its single line item
    /// * `Err(SaleError::Rejected)` - Unknown product or category, bad
    ///   quantity, not enough stock. No state changed.
    /// * `Err(SaleError::Storage)` - Database failure. No state changed.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // base 100.00, 16% tax, stock 25, threshold 20
    /// let sale = db.sale_workflow().sell(product_id, 10).await?;
    /// assert_eq!(sale.total_revenue_cents, 116_000);
    /// ```
    pub async fn sell(&self, product_id: i64, quantity: i64) -> Result<Sale, SaleError> {
        debug!(product_id = %product_id, quantity = %quantity, "Processing sale");

        let mut tx = self.pool.begin().await?;

        let product = product::fetch_product(&mut tx, product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(product_id))?;

        let category = match product.category_id {
            Some(category_id) => Some(
                category::fetch_category(&mut tx, category_id)
                    .await?
                    .ok_or(CoreError::CategoryNotFound(category_id))?,
            ),
            None => None,
        };

        let quote = SaleQuote::prepare(&product, category.as_ref(), quantity).map_err(|e| {
            warn!(product_id = %product_id, quantity = %quantity, error = %e, "Sale rejected");
            e
        })?;

        let now = Utc::now();
        let mut recorded = sale::insert_sale(&mut tx, now, quote.subtotal.cents()).await?;
        let item = sale::insert_item(&mut tx, recorded.id, &quote).await?;

        let remaining = match product::decrement_stock(&mut tx, product_id, quantity).await? {
            Some(remaining) => remaining,
            None => {
                let available = current_stock(&mut tx, product_id).await?;
                warn!(product_id = %product_id, available, quantity = %quantity, "Stock changed during sale");
                return Err(CoreError::InsufficientStock {
                    product_id,
                    available,
                    requested: quantity,
                }
                .into());
            }
        };

        let reorder = if quote.needs_reorder {
            Some(reorder::insert_reorder(&mut tx, product_id, DEFAULT_REORDER_QUANTITY, now).await?)
        } else {
            None
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %recorded.id,
            product_id = %product_id,
            quantity = quantity,
            total = %quote.subtotal,
            remaining_stock = remaining,
            "Sale recorded"
        );
        if let Some(reorder) = &reorder {
            info!(
                reorder_id = %reorder.id,
                product_id = %product_id,
                quantity = reorder.quantity,
                "Reorder requested"
            );
        }

        recorded.items.push(item);
        Ok(recorded)
    }
}

async fn current_stock(conn: &mut SqliteConnection, product_id: i64) -> Result<i64, SaleError> {
    let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(stock.unwrap_or(0))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tienda_core::{CategoryDraft, ProductDraft, ReorderStatus};

    /// Category at 16% and a product priced 100.00 with stock 25,
    /// reorder threshold 20.
    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db
            .categories()
            .save(&CategoryDraft {
                id: None,
                name: "Papelería".to_string(),
                tax_rate_bps: 1600,
            })
            .await
            .unwrap();
        let product = db
            .products()
            .save(&ProductDraft {
                id: None,
                name: "Cuaderno".to_string(),
                base_price_cents: 10_000,
                stock: 25,
                min_reorder_stock: 20,
                category_id: Some(category.id),
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_sale_applies_tax_and_requests_reorder() {
        let (db, product_id) = setup().await;

        let sale = db.sale_workflow().sell(product_id, 10).await.unwrap();

        assert_eq!(sale.total_revenue_cents, 116_000);
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].unit_price_cents, 11_600);
        assert_eq!(sale.items[0].subtotal_cents, 116_000);
        assert_eq!(sale.items[0].quantity, 10);

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 15);

        let reorders = db.reorders().list_all().await.unwrap();
        assert_eq!(reorders.len(), 1);
        assert_eq!(reorders[0].product_id, product_id);
        assert_eq!(reorders[0].quantity, DEFAULT_REORDER_QUANTITY);
        assert_eq!(reorders[0].status, ReorderStatus::Pending);
        assert!(reorders[0].completed_at.is_none());
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let (db, product_id) = setup().await;

        let err = db.sale_workflow().sell(product_id, 30).await.unwrap_err();
        match err {
            SaleError::Rejected(e @ CoreError::InsufficientStock { .. }) => {
                assert_eq!(e.to_string(), "Stock insuficiente. Disponibles: 25");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 25);
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.reorders().count_for_product(product_id).await.unwrap(), 0);
    }

    async fn sale_item_rows(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_reorder_insert_rolls_back_sale() {
        let (db, product_id) = setup().await;
        sqlx::query(
            "CREATE TRIGGER reject_reorders BEFORE INSERT ON reorders \
             BEGIN SELECT RAISE(ABORT, 'reorders unavailable'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        // 25 - 10 lands on the threshold, so the reorder insert runs after
        // the header, the line item and the decrement
        let result = db.sale_workflow().sell(product_id, 10).await;
        assert!(matches!(result, Err(SaleError::Storage(_))));

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 25);
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(sale_item_rows(&db).await, 0);
        assert_eq!(db.reorders().count_for_product(product_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stock_lost_mid_sale_rolls_back() {
        let (db, product_id) = setup().await;
        // Drains stock between the line item insert and the guarded decrement
        sqlx::query(
            "CREATE TRIGGER drain_stock AFTER INSERT ON sale_items \
             BEGIN UPDATE products SET stock = 0 WHERE id = NEW.product_id; END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let result = db.sale_workflow().sell(product_id, 5).await;
        assert!(matches!(
            result,
            Err(SaleError::Rejected(CoreError::InsufficientStock {
                available: 0,
                requested: 5,
                ..
            }))
        ));

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 25);
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(sale_item_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_subtotal_overflow_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .save(&ProductDraft {
                id: None,
                name: "Lingote".to_string(),
                base_price_cents: 100_000_000,
                stock: 1_000_000_000_000_000,
                min_reorder_stock: 0,
                category_id: None,
            })
            .await
            .unwrap();

        let result = db.sale_workflow().sell(product.id, 1_000_000_000_000_000).await;
        assert!(matches!(
            result,
            Err(SaleError::Rejected(CoreError::AmountOverflow { .. }))
        ));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected() {
        let (db, product_id) = setup().await;

        for quantity in [0, -4] {
            let result = db.sale_workflow().sell(product_id, quantity).await;
            assert!(matches!(
                result,
                Err(SaleError::Rejected(CoreError::InvalidQuantity { .. }))
            ));
        }
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (db, _) = setup().await;

        let result = db.sale_workflow().sell(9_999, 1).await;
        assert!(matches!(
            result,
            Err(SaleError::Rejected(CoreError::ProductNotFound(9_999)))
        ));
    }

    #[tokio::test]
    async fn test_no_reorder_above_threshold() {
        let (db, product_id) = setup().await;

        db.sale_workflow().sell(product_id, 4).await.unwrap();

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 21);
        assert_eq!(db.reorders().count_for_product(product_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_every_qualifying_sale_requests_a_reorder() {
        let (db, product_id) = setup().await;

        db.sale_workflow().sell(product_id, 6).await.unwrap();
        db.sale_workflow().sell(product_id, 1).await.unwrap();

        assert_eq!(db.reorders().count_for_product(product_id).await.unwrap(), 2);
        assert_eq!(db.reorders().list_pending().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_selling_entire_stock() {
        let (db, product_id) = setup().await;

        db.sale_workflow().sell(product_id, 25).await.unwrap();

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
        assert!(matches!(
            db.sale_workflow().sell(product_id, 1).await,
            Err(SaleError::Rejected(CoreError::InsufficientStock { available: 0, .. }))
        ));
    }

    #[tokio::test]
    async fn test_untaxed_product_sells_at_base_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .save(&ProductDraft {
                id: None,
                name: "Lápiz".to_string(),
                base_price_cents: 350,
                stock: 100,
                min_reorder_stock: 10,
                category_id: None,
            })
            .await
            .unwrap();

        let sale = db.sale_workflow().sell(product.id, 3).await.unwrap();
        assert_eq!(sale.items[0].unit_price_cents, 350);
        assert_eq!(sale.total_revenue_cents, 1_050);
    }
}
