//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    100.00 × 1.16 = 115.99999999999999 ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10000 cents × 11600 / 10000 = 11600 cents  (exactly 116.00)         │
//! │    Every rounding step is explicit and rounds half-up                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::money::Money;
//!
//! let price = Money::from_cents(11_600); // 116.00
//! let subtotal = price.checked_mul(10).unwrap();
//! assert_eq!(subtotal.to_string(), "1160.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

use crate::types::TaxRate;

/// Denominator of a basis-point fraction (10000 bps = 100%).
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Rounding
// =============================================================================

/// Divides `numerator` by a positive `denominator`, rounding half away from
/// zero (HALF_UP in decimal terms).
///
/// ## Example
/// ```text
/// div_round_half_up(  5, 2) =  3     ( 2.5 →  3)
/// div_round_half_up( -5, 2) = -3     (-2.5 → -3)
/// div_round_half_up(  7, 3) =  2     ( 2.33 → 2)
/// ```
pub fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0, "denominator must be positive");
    let quotient = (2 * numerator.abs() + denominator) / (2 * denominator);
    if numerator < 0 {
        -quotient
    } else {
        quotient
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Differences between amounts may be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as cents**: The wire format never carries floats
///
/// ## Where Money is Used
/// ```text
/// Product.base_price ──► final_unit_price (tax) ──► SaleItem.unit_price
///                                                         │
///                                   SaleItem.subtotal ◄───┘ × quantity
///                                         │
///                       Sale.total_revenue ◄┘ ──► Statistics (sum, average)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tienda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns this amount with a tax rate applied on top, rounded half-up to
    /// the cent. `None` when the taxed amount does not fit in an i64.
    ///
    /// ## Formula
    /// `round_half_up(amount × (1 + bps / 10000), 2)`, computed on cents as
    /// `round_half_up(cents × (10000 + bps) / 10000)`.
    ///
    /// ## Example
    /// ```rust
    /// use tienda_core::money::Money;
    /// use tienda_core::types::TaxRate;
    ///
    /// // 0.99 at 16% = 1.1484 → 1.15
    /// let price = Money::from_cents(99).with_tax_included(TaxRate::from_bps(1600));
    /// assert_eq!(price.map(|p| p.cents()), Some(115));
    /// ```
    pub fn with_tax_included(&self, rate: TaxRate) -> Option<Money> {
        let scaled = self.0 as i128 * (BPS_SCALE + rate.bps() as i128);
        i64::try_from(div_round_half_up(scaled, BPS_SCALE)).ok().map(Money)
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tienda_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_mul(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Average of this total over `count` entries, rounded half-up to the
    /// cent. Zero entries average to zero.
    ///
    /// ## Example
    /// ```rust
    /// use tienda_core::money::Money;
    ///
    /// // 10.00 over 3 sales = 3.333… → 3.33
    /// assert_eq!(Money::from_cents(1000).average_over(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1000).average_over(0), Money::zero());
    /// ```
    pub fn average_over(&self, count: i64) -> Money {
        if count <= 0 {
            return Money::zero();
        }
        // |quotient| <= |self| once count >= 1, so it narrows back losslessly
        Money(div_round_half_up(self.0 as i128, count as i128) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as a plain 2-decimal amount, e.g. `1160.00` or `-5.50`.
///
/// ## Note
/// Currency symbols and localisation are the frontend's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(116_000).to_string(), "1160.00");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_div_round_half_up() {
        assert_eq!(div_round_half_up(5, 2), 3);
        assert_eq!(div_round_half_up(-5, 2), -3);
        assert_eq!(div_round_half_up(7, 3), 2);
        assert_eq!(div_round_half_up(8, 3), 3);
        assert_eq!(div_round_half_up(0, 9), 0);
    }

    #[test]
    fn test_tax_included_exact() {
        // 100.00 at 16% = 116.00
        let price = Money::from_cents(10_000).with_tax_included(TaxRate::from_bps(1600));
        assert_eq!(price, Some(Money::from_cents(11_600)));
    }

    #[test]
    fn test_tax_included_rounds_half_up() {
        // 10.00 at 8.25% = 10.825 → 10.83
        let price = Money::from_cents(1000).with_tax_included(TaxRate::from_bps(825));
        assert_eq!(price, Some(Money::from_cents(1083)));

        // 0.10 at 5% = 0.105 → 0.11 (half-up, not half-even)
        let price = Money::from_cents(10).with_tax_included(TaxRate::from_bps(500));
        assert_eq!(price, Some(Money::from_cents(11)));
    }

    #[test]
    fn test_zero_tax_keeps_amount() {
        let price = Money::from_cents(1234).with_tax_included(TaxRate::zero());
        assert_eq!(price, Some(Money::from_cents(1234)));
    }

    #[test]
    fn test_tax_included_overflow_is_none() {
        let price = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(price.with_tax_included(TaxRate::from_bps(10_000)), None);
        assert!(price.with_tax_included(TaxRate::zero()).is_some());
    }

    #[test]
    fn test_checked_mul_overflow_is_none() {
        assert_eq!(Money::from_cents(100_000_000).checked_mul(1_000_000_000_000_000), None);
        assert_eq!(Money::from_cents(-5).checked_mul(3), Some(Money::from_cents(-15)));
    }

    #[test]
    fn test_average_over() {
        assert_eq!(Money::from_cents(1000).average_over(3).cents(), 333);
        // 20.00 / 3 = 6.666… → 6.67
        assert_eq!(Money::from_cents(2000).average_over(3).cents(), 667);
        // 0.05 / 2 = 0.025 → 0.03
        assert_eq!(Money::from_cents(5).average_over(2).cents(), 3);
        assert_eq!(Money::from_cents(1000).average_over(0).cents(), 0);
    }

    #[test]
    fn test_sum_and_arithmetic() {
        let total: Money = [100, 250, 650].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 1000);

        let a = Money::from_cents(1000);
        assert_eq!((a + Money::from_cents(500)).cents(), 1500);
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(11_600)).unwrap();
        assert_eq!(json, "11600");
    }
}
