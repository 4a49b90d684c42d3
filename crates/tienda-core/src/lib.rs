//! # tienda-core: Pure Business Logic for Tienda Inventory
//!
//! This crate contains the store's business rules as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tienda Inventory Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web Frontend (React)                            │   │
//! │  │      Product list ──► Sell form ──► Statistics panel            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tienda-api (axum)                            │   │
//! │  │    GET /products, POST /products/sell/:id, GET /statistics      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ tienda-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │   stats   │  │   │
//! │  │   │  Product  │  │   Money   │  │ SaleQuote │  │ Snapshot  │  │   │
//! │  │   │   Sale    │  │  rounding │  │ final px  │  │ best sell │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   tienda-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, atomic sale workflow         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Sale, ReorderRecord, ...)
//! - [`money`] - Money type with integer arithmetic and half-up rounding
//! - [`pricing`] - Tax-inclusive prices and sale quotes
//! - [`stats`] - Sales statistics aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tienda_core::money::Money;
//! use tienda_core::types::TaxRate;
//!
//! // 100.00 with 16% tax included
//! let price = Money::from_cents(10_000).with_tax_included(TaxRate::from_bps(1600));
//! assert_eq!(price, Some(Money::from_cents(11_600)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{final_unit_price, SaleQuote};
pub use stats::{compute_statistics, ProductSales, SalesStatistics};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Units requested every time a sale leaves a product at or below its
/// reorder threshold.
///
/// ## Business Reason
/// Fixed replenishment lot agreed with suppliers. Every qualifying sale
/// raises a new request; pending requests are not merged.
pub const DEFAULT_REORDER_QUANTITY: i64 = 20;

/// Maximum length of product and category names.
pub const MAX_NAME_LENGTH: usize = 200;
