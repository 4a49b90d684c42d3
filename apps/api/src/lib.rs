//! # tienda-api: HTTP/JSON API for Tienda Inventory
//!
//! Exposes the catalog, the sale workflow, the sales ledger, reorders and
//! statistics to the web frontend.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Browser                                                                │
//! │     │  POST /api/products/sell/7  { "quantity": 10 }                   │
//! │     ▼                                                                   │
//! │  TraceLayer ──► CorsLayer ──► Router (nested under /api)               │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                      routes::products::sell_product                    │
//! │                                   │  state.db.sale_workflow().sell()   │
//! │                                   ▼                                     │
//! │                      Json<Sale>  or  ApiError { code, message }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is built by [`build_router`] so the binary and the HTTP tests
//! share exactly the same stack.

pub mod config;
pub mod error;
pub mod routes;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tienda_db::Database;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::{ApiError, ErrorCode};

/// Shared application state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    /// Wraps an opened database.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the application router with CORS and request tracing.
///
/// ## Example
/// ```rust,ignore
/// let app = build_router(AppState::new(db), &config.cors_allowed_origins);
/// axum::serve(listener, app).await?;
/// ```
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .nest("/api", routes::api_router())
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins; `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
