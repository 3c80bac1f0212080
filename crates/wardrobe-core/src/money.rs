//! # Money Module
//!
//! Integer-cents money type used for purchase prices and spending analytics.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Purchase records are summed over months of history.                    │
//! │                                                                         │
//! │  In floating point:  0.1 + 0.2 = 0.30000000000000004                    │
//! │  In cents:           10 + 20   = 30                                     │
//! │                                                                         │
//! │  Only cost-per-wear divides, and it rounds half up to whole cents.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wardrobe_core::money::Money;
//!
//! let pack = Money::from_cents(2400); // $24.00 for a pack of socks
//! let per_wear = pack.per_unit(16).unwrap();
//! assert_eq!(per_wear.cents(), 150);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

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

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Splits the amount evenly over `units`, rounding half up to whole cents.
    ///
    /// Returns `None` when `units` is not positive (nothing to divide by).
    ///
    /// ## Example
    /// ```rust
    /// use wardrobe_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).per_unit(3).unwrap().cents(), 333);
    /// assert_eq!(Money::from_cents(1000).per_unit(6).unwrap().cents(), 167);
    /// assert!(Money::from_cents(1000).per_unit(0).is_none());
    /// ```
    pub fn per_unit(&self, units: i64) -> Option<Money> {
        if units <= 0 {
            return None;
        }
        // i128 keeps the doubled numerator from overflowing
        let doubled = self.0 as i128 * 2 + units as i128;
        Some(Money((doubled / (units as i128 * 2)) as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
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
