//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing with resolved categories and tax-inclusive prices
//! - Save (insert or update) of validated drafts
//! - Guarded stock changes used by the sale workflow and reorders
//!
//! ## Guarded Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, subtract in Rust, write absolute value                 │
//! │     UPDATE products SET stock = 15 WHERE id = ?                        │
//! │                                                                         │
//! │  ✅ CORRECT: delta with a guard, evaluated by SQLite                    │
//! │     UPDATE products SET stock = stock - ?2                             │
//! │     WHERE id = ?1 AND stock >= ?2                                      │
//! │                                                                         │
//! │  Two sales racing for the last units: only one row update succeeds,    │
//! │  the other sees zero rows and is rejected. CHECK (stock >= 0) backs    │
//! │  this up at the schema level.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::category::fetch_all_categories;
use tienda_core::validation::validate_product_draft;
use tienda_core::{Product, ProductDraft, ProductListing};

// =============================================================================
// Connection-level queries
// =============================================================================
//
// These take a bare connection so they can run either on a pooled
// connection or inside a transaction (`&mut *tx`).

pub(crate) async fn fetch_product(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, base_price_cents, stock, min_reorder_stock, category_id
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

pub(crate) async fn fetch_all_products(conn: &mut SqliteConnection) -> DbResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, base_price_cents, stock, min_reorder_stock, category_id
        FROM products
        ORDER BY id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(products)
}

/// Takes `quantity` units out of stock if at least that many remain.
///
/// Returns the new stock level, or `None` when the guard rejected the
/// update (product missing or not enough stock).
pub(crate) async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
) -> DbResult<Option<i64>> {
    debug!(id = %id, quantity = %quantity, "Decrementing stock");

    let remaining: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE products
        SET stock = stock - ?2
        WHERE id = ?1 AND stock >= ?2
        RETURNING stock
        "#,
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(remaining)
}

/// Adds `quantity` units to stock, returning the new level.
pub(crate) async fn increment_stock(conn: &mut SqliteConnection, id: i64, quantity: i64) -> DbResult<i64> {
    debug!(id = %id, quantity = %quantity, "Incrementing stock");

    let stock: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE products
        SET stock = stock + ?2
        WHERE id = ?1
        RETURNING stock
        "#,
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await?;

    stock.ok_or_else(|| DbError::not_found("Product", id))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let listings = repo.list_listings().await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_all_products(&mut conn).await
    }

    /// Lists every product with its category and tax-inclusive price.
    ///
    /// Categories are loaded once and joined in memory; a dangling
    /// `category_id` yields a listing without category (base price).
    pub async fn list_listings(&self) -> DbResult<Vec<ProductListing>> {
        let mut conn = self.pool.acquire().await?;

        let products = fetch_all_products(&mut conn).await?;
        let categories: HashMap<i64, _> = fetch_all_categories(&mut conn)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        // A stored price whose taxed value leaves i64 is corrupt data
        let listings = products
            .into_iter()
            .map(|product| {
                let category = product.category_id.and_then(|id| categories.get(&id).cloned());
                ProductListing::new(product, category)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        debug!(count = listings.len(), "Listed products");
        Ok(listings)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Inserts (`id: None`) or updates a product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored row
    /// * `Err(DbError::Validation)` - Draft failed business rules
    /// * `Err(DbError::NotFound)` - Update of an unknown id
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown `category_id`
    pub async fn save(&self, draft: &ProductDraft) -> DbResult<Product> {
        validate_product_draft(draft)?;
        let name = draft.name.trim();

        match draft.id {
            None => {
                debug!(name = %name, "Inserting product");

                let product = sqlx::query_as::<_, Product>(
                    r#"
                    INSERT INTO products (name, base_price_cents, stock, min_reorder_stock, category_id)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    RETURNING id, name, base_price_cents, stock, min_reorder_stock, category_id
                    "#,
                )
                .bind(name)
                .bind(draft.base_price_cents)
                .bind(draft.stock)
                .bind(draft.min_reorder_stock)
                .bind(draft.category_id)
                .fetch_one(&self.pool)
                .await?;

                Ok(product)
            }
            Some(id) => {
                debug!(id = %id, "Updating product");

                let product = sqlx::query_as::<_, Product>(
                    r#"
                    UPDATE products SET
                        name = ?2,
                        base_price_cents = ?3,
                        stock = ?4,
                        min_reorder_stock = ?5,
                        category_id = ?6
                    WHERE id = ?1
                    RETURNING id, name, base_price_cents, stock, min_reorder_stock, category_id
                    "#,
                )
                .bind(id)
                .bind(name)
                .bind(draft.base_price_cents)
                .bind(draft.stock)
                .bind(draft.min_reorder_stock)
                .bind(draft.category_id)
                .fetch_optional(&self.pool)
                .await?;

                product.ok_or_else(|| DbError::not_found("Product", id))
            }
        }
    }

    /// Counts total products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
