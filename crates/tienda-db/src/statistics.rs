//! # Statistics Reader
//!
//! Loads the catalog and the ledger inside one read transaction and hands
//! them to [`tienda_core::compute_statistics`], so a snapshot never mixes
//! rows from before and after a concurrent sale.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{product, sale};
use tienda_core::{compute_statistics, SalesStatistics};

/// Produces [`SalesStatistics`] snapshots.
#[derive(Debug, Clone)]
pub struct StatisticsReader {
    pool: SqlitePool,
}

impl StatisticsReader {
    /// Creates a new StatisticsReader.
    pub fn new(pool: SqlitePool) -> Self {
        StatisticsReader { pool }
    }

    /// Computes statistics over every product and recorded sale.
    ///
    /// With no sales the revenue and average are 0 and there is no best
    /// seller; that is a normal result, not an error.
    pub async fn snapshot(&self) -> DbResult<SalesStatistics> {
        let mut tx = self.pool.begin().await?;

        let products = product::fetch_all_products(&mut tx).await?;
        let sales = sale::fetch_all_sales(&mut tx).await?;
        let items = sale::fetch_all_items(&mut tx).await?;

        // Read-only; ending with a rollback releases the snapshot
        tx.rollback().await?;

        let stats = compute_statistics(&products, &sales, &items);
        debug!(
            sales = stats.total_sales_count,
            revenue_cents = stats.total_revenue_cents,
            "Computed statistics snapshot"
        );
        Ok(stats)
    }
}
