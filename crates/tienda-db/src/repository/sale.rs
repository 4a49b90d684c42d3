//! # Sale Repository
//!
//! Database operations for the sales ledger (sale headers and line items).
//!
//! ## Sale Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales                          sale_items                              │
//! │  ┌────────────────────┐        ┌────────────────────────────────┐      │
//! │  │ id: 12             │◄───────│ sale_id: 12                    │      │
//! │  │ sold_at            │        │ product_id: 7                  │      │
//! │  │ total_revenue: ... │        │ quantity: 10                   │      │
//! │  └────────────────────┘        │ unit_price / subtotal (frozen) │      │
//! │                                └────────────────────────────────┘      │
//! │                                                                         │
//! │  Headers are written by the sale workflow only. Deleting a sale         │
//! │  removes its items first, then the header, in one transaction.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tienda_core::{Sale, SaleItem, SaleQuote};

// =============================================================================
// Connection-level queries
// =============================================================================

pub(crate) async fn insert_sale(
    conn: &mut SqliteConnection,
    sold_at: DateTime<Utc>,
    total_revenue_cents: i64,
) -> DbResult<Sale> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        INSERT INTO sales (sold_at, total_revenue_cents)
        VALUES (?1, ?2)
        RETURNING id, sold_at, total_revenue_cents
        "#,
    )
    .bind(sold_at)
    .bind(total_revenue_cents)
    .fetch_one(&mut *conn)
    .await?;

    Ok(sale)
}

/// Writes the line item described by `quote` under `sale_id`.
pub(crate) async fn insert_item(conn: &mut SqliteConnection, sale_id: i64, quote: &SaleQuote) -> DbResult<SaleItem> {
    let item = sqlx::query_as::<_, SaleItem>(
        r#"
        INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents, subtotal_cents)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
        "#,
    )
    .bind(sale_id)
    .bind(quote.product_id)
    .bind(quote.quantity)
    .bind(quote.unit_price.cents())
    .bind(quote.subtotal.cents())
    .fetch_one(&mut *conn)
    .await?;

    Ok(item)
}

async fn fetch_sale(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(
        "SELECT id, sold_at, total_revenue_cents FROM sales WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(sale)
}

async fn fetch_items(conn: &mut SqliteConnection, sale_id: i64) -> DbResult<Vec<SaleItem>> {
    let items = sqlx::query_as::<_, SaleItem>(
        r#"
        SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
        FROM sale_items
        WHERE sale_id = ?1
        ORDER BY id
        "#,
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

/// Sale headers, newest first (ids grow with `sold_at`). Items are not attached.
pub(crate) async fn fetch_all_sales(conn: &mut SqliteConnection) -> DbResult<Vec<Sale>> {
    let sales = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, sold_at, total_revenue_cents
        FROM sales
        ORDER BY id DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(sales)
}

pub(crate) async fn fetch_all_items(conn: &mut SqliteConnection) -> DbResult<Vec<SaleItem>> {
    let items = sqlx::query_as::<_, SaleItem>(
        r#"
        SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
        FROM sale_items
        ORDER BY id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

// =============================================================================
// Repository
// =============================================================================

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

    /// Gets a sale with its line items.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;

        let Some(mut sale) = fetch_sale(&mut conn, id).await? else {
            return Ok(None);
        };
        sale.items = fetch_items(&mut conn, id).await?;

        Ok(Some(sale))
    }

    /// Lists all sales, newest first, each with its line items.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let mut conn = self.pool.acquire().await?;

        let mut sales = fetch_all_sales(&mut conn).await?;
        let mut items_by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::new();
        for item in fetch_all_items(&mut conn).await? {
            items_by_sale.entry(item.sale_id).or_default().push(item);
        }

        for sale in &mut sales {
            sale.items = items_by_sale.remove(&sale.id).unwrap_or_default();
        }

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Deletes a sale and its line items.
    ///
    /// Items go first, then the header, in one transaction. Stock and
    /// reorder records are left as they are.
    ///
    /// ## Returns
    /// * `Ok(())` - Sale removed
    /// * `Err(DbError::NotFound)` - No sale with this id
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let items = sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sale_id = %id, items = items, "Sale deleted");
        Ok(())
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tienda_core::ProductDraft;

    async fn database_with_product() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .save(&ProductDraft {
                id: None,
                name: "Lápiz".to_string(),
                base_price_cents: 350,
                stock: 100,
                min_reorder_stock: 5,
                category_id: None,
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_get_by_id_attaches_items() {
        let (db, product_id) = database_with_product().await;
        let sold = db.sale_workflow().sell(product_id, 3).await.unwrap();

        let sale = db.sales().get_by_id(sold.id).await.unwrap().unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].quantity, 3);
        assert_eq!(sale.items_total(), sale.total_revenue());

        assert!(db.sales().get_by_id(sold.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let (db, product_id) = database_with_product().await;
        let first = db.sale_workflow().sell(product_id, 1).await.unwrap();
        let second = db.sale_workflow().sell(product_id, 2).await.unwrap();

        let sales = db.sales().list_all().await.unwrap();
        let ids: Vec<i64> = sales.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(sales.iter().all(|s| s.items.len() == 1));
    }

    #[tokio::test]
    async fn test_delete_removes_items_and_header() {
        let (db, product_id) = database_with_product().await;
        let sale = db.sale_workflow().sell(product_id, 4).await.unwrap();

        db.sales().delete(sale.id).await.unwrap();

        assert_eq!(db.sales().count().await.unwrap(), 0);
        let remaining_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining_items, 0);

        assert!(matches!(
            db.sales().delete(sale.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
