//! # Routes
//!
//! One module per resource, merged under `/api`.
//!
//! ## Available Routes
//! ```text
//! GET    /api/products                    → [ProductListing]
//! POST   /api/products/save               → Product
//! POST   /api/products/sell/:id           → Sale
//! GET    /api/categories                  → [Category]
//! POST   /api/categories/save             → Category
//! GET    /api/sales                       → [Sale]
//! GET    /api/sales/:id                   → Sale
//! DELETE /api/sales/:id                   → 204
//! GET    /api/reorders?pending=true       → [ReorderRecord]
//! POST   /api/reorders/:id/complete       → ReorderRecord
//! GET    /api/statistics                  → SalesStatistics
//! GET    /api/health                      → { status }
//! ```

pub mod categories;
pub mod health;
pub mod products;
pub mod reorders;
pub mod sales;
pub mod statistics;

use axum::Router;

use crate::AppState;

/// All API routes, to be nested under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(categories::router())
        .merge(sales::router())
        .merge(reorders::router())
        .merge(statistics::router())
        .merge(health::router())
}
