//! # Validation Module
//!
//! Input validation for catalog edits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (tienda-api)                                  │
//! │  └── JSON shape and types (serde)                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: Business rule validation                        │
//! │  └── names, prices, stock levels, tax rates                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0)                                                │
//! │  └── Foreign key constraints (category_id, product_id, sale_id)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::validation::{validate_name, validate_tax_rate_bps};
//!
//! assert!(validate_name("name", "Cuaderno").is_ok());
//! assert!(validate_tax_rate_bps(20_000).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CategoryDraft, ProductDraft};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest accepted tax rate: 10000 bps = 100%.
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a display name (product or category).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates that a count or amount is zero or more.
///
/// ## Example
/// ```rust
/// use tienda_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("stock", 0).is_ok());
/// assert!(validate_non_negative("stock", -1).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate_bps".to_string(),
            min: 0,
            max: MAX_TAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Draft Validators
// =============================================================================

/// Validates a product before it is saved.
pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_name("name", &draft.name)?;
    validate_non_negative("base_price_cents", draft.base_price_cents)?;
    validate_non_negative("stock", draft.stock)?;
    validate_non_negative("min_reorder_stock", draft.min_reorder_stock)?;
    Ok(())
}

/// Validates a category before it is saved.
pub fn validate_category_draft(draft: &CategoryDraft) -> ValidationResult<()> {
    validate_name("name", &draft.name)?;
    validate_tax_rate_bps(draft.tax_rate_bps)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            id: None,
            name: "Cuaderno".to_string(),
            base_price_cents: 10_000,
            stock: 25,
            min_reorder_stock: 20,
            category_id: Some(1),
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Cuaderno").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1600).is_ok());
        assert!(validate_tax_rate_bps(10_000).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_product_draft() {
        assert!(validate_product_draft(&draft()).is_ok());

        let mut bad = draft();
        bad.stock = -1;
        assert!(matches!(
            validate_product_draft(&bad),
            Err(ValidationError::MustNotBeNegative { field }) if field == "stock"
        ));

        let mut bad = draft();
        bad.base_price_cents = -100;
        assert!(validate_product_draft(&bad).is_err());
    }

    #[test]
    fn test_validate_category_draft() {
        let ok = CategoryDraft {
            id: None,
            name: "Papelería".to_string(),
            tax_rate_bps: 1600,
        };
        assert!(validate_category_draft(&ok).is_ok());

        let bad = CategoryDraft {
            tax_rate_bps: 20_000,
            ..ok
        };
        assert!(validate_category_draft(&bad).is_err());
    }
}
