//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tienda API                             │
//! │                                                                         │
//! │  Handler -> Result<Json<T>, ApiError>                                  │
//! │         │                                                               │
//! │         ├── CoreError::ProductNotFound     ──► 404 NOT_FOUND            │
//! │         ├── CoreError::InsufficientStock   ──► 400 INSUFFICIENT_STOCK   │
//! │         ├── CoreError::InvalidQuantity     ──► 400 VALIDATION_ERROR     │
//! │         ├── malformed body or path         ──► 400 VALIDATION_ERROR     │
//! │         ├── DbError::ForeignKeyViolation   ──► 400 VALIDATION_ERROR     │
//! │         └── DbError::QueryFailed, ...      ──► 500 DATABASE_ERROR       │
//! │                                              (logged, generic message) │
//! │                                                                         │
//! │  fetch('/api/products/sell/7', ...)                                     │
//! │    // 400 { "code": "INSUFFICIENT_STOCK",                               │
//! │    //       "message": "Stock insuficiente. Disponibles: 25" }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tienda_core::CoreError;
use tienda_db::{DbError, SaleError};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 7"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Not enough stock for the requested sale (400)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                ApiError::validation("Value out of range")
            }
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::CategoryNotFound(id) => ApiError::not_found("Category", id),
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ (CoreError::InvalidQuantity { .. } | CoreError::AmountOverflow { .. }) => {
                ApiError::validation(e.to_string())
            }
        }
    }
}

impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Rejected(e) => e.into(),
            SaleError::Storage(e) => e.into(),
        }
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Path segments that do not parse, e.g. `/api/sales/abc`.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err: ApiError = CoreError::InsufficientStock {
            product_id: 7,
            available: 25,
            requested: 30,
        }
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Stock insuficiente. Disponibles: 25");
    }

    #[test]
    fn test_amount_overflow_is_bad_request() {
        let err: ApiError = SaleError::Rejected(CoreError::AmountOverflow { product_id: 4 }).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let err: ApiError = DbError::QueryFailed("near \"SELEC\": syntax error".to_string()).into();
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_not_found_status() {
        let err: ApiError = SaleError::Rejected(CoreError::ProductNotFound(3)).into();
        assert_eq!(err.code.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Product not found: 3");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(ApiError::validation("bad")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }
}
