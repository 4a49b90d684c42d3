//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tienda-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tienda-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── SaleError        - CoreError | DbError from the sale workflow     │
//! │                                                                         │
//! │  tienda-api errors                                                     │
//! │  └── ApiError         - What HTTP clients see { code, message }        │
//! │                                                                         │
//! │  Flow: CoreError → SaleError → ApiError → Client                       │
//! │        ValidationError → DbError → ApiError → Client                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is a rejection: when one is returned from the sale
/// workflow nothing has been written.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// A product references a category that does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// Requested quantity is zero or negative.
    #[error("Quantity must be positive, got {requested}")]
    InvalidQuantity { requested: i64 },

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell (qty: 30)
    ///      │
    ///      ▼
    /// Check stock: available=25
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 25, requested: 30 }
    ///      │
    ///      ▼
    /// Client shows: "Stock insuficiente. Disponibles: 25"
    /// ```
    #[error("Stock insuficiente. Disponibles: {available}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Price or subtotal does not fit in i64 cents.
    #[error("Amount out of range for product {product_id}")]
    AmountOverflow { product_id: i64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything is written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_reports_available() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 25,
            requested: 30,
        };
        assert_eq!(err.to_string(), "Stock insuficiente. Disponibles: 25");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        };
        assert_eq!(err.to_string(), "stock must not be negative");
    }
}
