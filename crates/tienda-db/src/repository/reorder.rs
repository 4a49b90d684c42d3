//! # Reorder Repository
//!
//! Replenishment requests raised by the sale workflow.
//!
//! ## Lifecycle
//! ```text
//! sale leaves stock <= min_reorder_stock
//!        │
//!        ▼
//!   PENDING (quantity 20, requested_at)
//!        │  complete(id): stock += quantity, completed_at = now
//!        ▼
//!   COMPLETED
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::product::increment_stock;
use tienda_core::{ReorderRecord, ReorderStatus};

pub(crate) async fn insert_reorder(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
    requested_at: DateTime<Utc>,
) -> DbResult<ReorderRecord> {
    let record = sqlx::query_as::<_, ReorderRecord>(
        r#"
        INSERT INTO reorders (product_id, quantity, requested_at, status)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, product_id, quantity, requested_at, status, completed_at
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(requested_at)
    .bind(ReorderStatus::Pending)
    .fetch_one(&mut *conn)
    .await?;

    Ok(record)
}

/// Repository for reorder records.
#[derive(Debug, Clone)]
pub struct ReorderRepository {
    pool: SqlitePool,
}

impl ReorderRepository {
    /// Creates a new ReorderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReorderRepository { pool }
    }

    /// Lists every reorder, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<ReorderRecord>> {
        let records = sqlx::query_as::<_, ReorderRecord>(
            r#"
            SELECT id, product_id, quantity, requested_at, status, completed_at
            FROM reorders
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Lists reorders still waiting for goods, oldest first.
    pub async fn list_pending(&self) -> DbResult<Vec<ReorderRecord>> {
        let records = sqlx::query_as::<_, ReorderRecord>(
            r#"
            SELECT id, product_id, quantity, requested_at, status, completed_at
            FROM reorders
            WHERE status = ?1
            ORDER BY id
            "#,
        )
        .bind(ReorderStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Number of reorders (any status) raised for a product.
    pub async fn count_for_product(&self, product_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reorders WHERE product_id = ?1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Marks a pending reorder as received and adds its units to stock.
    ///
    /// Both writes happen in one transaction.
    ///
    /// ## Returns
    /// * `Ok(ReorderRecord)` - The completed record
    /// * `Err(DbError::NotFound)` - No pending reorder with this id
    pub async fn complete(&self, id: i64) -> DbResult<ReorderRecord> {
        debug!(id = %id, "Completing reorder");

        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, ReorderRecord>(
            r#"
            UPDATE reorders
            SET status = ?2, completed_at = ?3
            WHERE id = ?1 AND status = ?4
            RETURNING id, product_id, quantity, requested_at, status, completed_at
            "#,
        )
        .bind(id)
        .bind(ReorderStatus::Completed)
        .bind(Utc::now())
        .bind(ReorderStatus::Pending)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Pending reorder", id))?;

        let stock = increment_stock(&mut tx, record.product_id, record.quantity).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            reorder_id = %record.id,
            product_id = %record.product_id,
            quantity = record.quantity,
            stock = stock,
            "Reorder completed"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tienda_core::ProductDraft;

    #[tokio::test]
    async fn test_complete_restocks_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .save(&ProductDraft {
                id: None,
                name: "Cuaderno".to_string(),
                base_price_cents: 10_000,
                stock: 25,
                min_reorder_stock: 20,
                category_id: None,
            })
            .await
            .unwrap();

        db.sale_workflow().sell(product.id, 10).await.unwrap();
        let pending = db.reorders().list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);

        let completed = db.reorders().complete(pending[0].id).await.unwrap();
        assert_eq!(completed.status, ReorderStatus::Completed);
        assert!(completed.completed_at.is_some());

        let restocked = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(restocked.stock, 35);
        assert!(db.reorders().list_pending().await.unwrap().is_empty());
        assert_eq!(db.reorders().list_all().await.unwrap().len(), 1);

        // A completed reorder cannot be completed twice
        assert!(matches!(
            db.reorders().complete(completed.id).await,
            Err(DbError::NotFound { .. })
        ));
        let unchanged = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(unchanged.stock, 35);
    }
}
