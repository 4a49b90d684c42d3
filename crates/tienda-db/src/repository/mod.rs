//! # Repository Module
//!
//! Database repository implementations for the store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │  db.products().list_listings()                                 │
//! │       ▼                                                                 │
//! │  ProductRepository (holds a pool handle)                               │
//! │       │  acquires a connection, calls                                  │
//! │       ▼                                                                 │
//! │  fetch_product(&mut conn, id)   ← connection-level function            │
//! │       ▲                                                                 │
//! │       │  the same functions run inside a transaction (&mut *tx)        │
//! │  SaleWorkflow / StatisticsReader                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product listing, save and stock changes
//! - [`CategoryRepository`](category::CategoryRepository) - Category listing and save
//! - [`SaleRepository`](sale::SaleRepository) - Sales ledger queries and deletion
//! - [`ReorderRepository`](reorder::ReorderRepository) - Reorder queries and completion

pub mod category;
pub mod product;
pub mod reorder;
pub mod sale;
