//! # Money Module
//!
//! Provides the `Money` type for price display.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The inventory API sends prices as JSON numbers (floats):               │
//! │    PrecioClaseDefault: 1.0714285714                                     │
//! │                                                                         │
//! │  Rounding the base and then rounding the tax again can show a           │
//! │  shelf price one cent off from the register.                            │
//! │                                                                         │
//! │  OUR SOLUTION: round ONCE at the boundary                               │
//! │    1.0714285714 × 1.12 = 1.1999999 → 120 cents → "$1.20"                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricecheck_core::money::Money;
//!
//! let price = Money::from_amount(10.99).unwrap();
//! assert_eq!(price.cents(), 1099);
//! assert_eq!(price.to_string(), "$10.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts an API amount (major units as a float) to cents.
    ///
    /// Rounds half away from zero: `2.675` → 268 cents.
    ///
    /// ## Example
    /// ```rust
    /// use pricecheck_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(1.005).unwrap().cents(), 101);
    /// assert!(Money::from_amount(f64::NAN).is_err());
    /// ```
    pub fn from_amount(amount: f64) -> CoreResult<Self> {
        Self::from_field_amount("amount", amount)
    }

    /// Same as [`Money::from_amount`], naming the source field in the error.
    pub fn from_field_amount(field: &str, amount: f64) -> CoreResult<Self> {
        // 1.005 is stored as 1.00499999..., the nudge puts it back on the half
        let scaled = amount * 100.0;
        let nudged = scaled + scaled.signum() * 1e-9;
        let cents = nudged.round();

        if !cents.is_finite() || cents.abs() > i64::MAX as f64 {
            return Err(CoreError::InvalidAmount {
                field: field.to_string(),
                value: amount,
            });
        }

        Ok(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as it appears on the kiosk screen: `$10.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
