//! # tienda-db: Database Layer for Tienda Inventory
//!
//! This crate provides database access for the store backend.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tienda Inventory Data Flow                         │
//! │                                                                         │
//! │  HTTP handler (POST /api/products/sell/:id)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tienda-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ ProductRepo   │    │  (embedded)  │  │   │
//! │  │   │               │    │ CategoryRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 001_init.sql │  │   │
//! │  │   │               │    │ ReorderRepo   │    │              │  │   │
//! │  │   └───────▲───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────┴────────┐   ┌──────────────────┐                    │   │
//! │  │   │  SaleWorkflow  │   │ StatisticsReader │                    │   │
//! │  │   │ (one tx/sale)  │   │ (one read tx)    │                    │   │
//! │  │   └────────────────┘   └──────────────────┘                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (tienda.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, category, sale, reorder)
//! - [`workflow`] - The transactional sale workflow
//! - [`statistics`] - Consistent statistics snapshots
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tienda_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./tienda.db")).await?;
//!
//! let sale = db.sale_workflow().sell(product_id, 10).await?;
//! let stats = db.statistics().snapshot().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod statistics;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use statistics::StatisticsReader;
pub use workflow::{SaleError, SaleWorkflow};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::reorder::ReorderRepository;
pub use repository::sale::SaleRepository;
