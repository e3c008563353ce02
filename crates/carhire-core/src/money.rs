//! # Money Module
//!
//! Provides the `Money` type for rental prices and booking totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    85.10 × 3 days = 255.29999999999998  ❌ WRONG!                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    8510 cents × 3 = 25530 cents = 255.30                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use carhire_core::money::Money;
//!
//! let daily = Money::from_cents(8500); // $85.00 per day
//! let total = daily.multiply_days(3);
//! assert_eq!(total.cents(), 25500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ```text
/// Car.price_per_day_cents ──► quote(days) ──► Booking.total_price_cents
///          │
///          └──► SearchCriteria min/max price (inclusive)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use carhire_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(100).cents(), 10_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Like [`Money::from_major`], but `None` when the cents overflow.
    ///
    /// ## Example
    /// ```rust
    /// use carhire_core::money::Money;
    ///
    /// assert_eq!(Money::checked_from_major(85), Some(Money::from_cents(8500)));
    /// assert_eq!(Money::checked_from_major(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_from_major(major: i64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit part (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents part (0-99, always positive).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a daily rate by a number of rental days.
    ///
    /// ## Example
    /// ```rust
    /// use carhire_core::money::Money;
    ///
    /// let daily = Money::from_cents(14500);
    /// assert_eq!(daily.multiply_days(2).cents(), 29000);
    /// ```
    #[inline]
    pub const fn multiply_days(&self, days: i64) -> Self {
        Money(self.0 * days)
    }

    /// Like [`Money::multiply_days`], but `None` on overflow.
    #[inline]
    pub const fn checked_multiply_days(&self, days: i64) -> Option<Self> {
        match self.0.checked_mul(days) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$85.00`. UI layers do their own localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
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

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing booking totals (owner earnings, renter spend).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(8599);
        assert_eq!(money.cents(), 8599);
        assert_eq!(money.dollars(), 85);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
        assert_eq!(Money::from_major(145).cents(), 14500);
    }

    #[test]
    fn test_checked_arithmetic_rejects_overflow() {
        assert_eq!(Money::checked_from_major(145), Some(Money::from_cents(14500)));
        assert_eq!(Money::checked_from_major(i64::MAX), None);
        assert_eq!(Money::checked_from_major(i64::MIN / 50), None);

        let daily = Money::from_cents(8500);
        assert_eq!(daily.checked_multiply_days(3), Some(Money::from_cents(25500)));
        assert_eq!(Money::from_cents(i64::MAX / 2).checked_multiply_days(3), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(8500).to_string(), "$85.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_multiply_days_and_sum() {
        let daily = Money::from_cents(8510);
        assert_eq!(daily.multiply_days(3).cents(), 25530);

        let total: Money = vec![Money::from_cents(100), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 350);
    }

    #[test]
    fn test_ordering_for_price_bounds() {
        assert!(Money::from_cents(14500) > crate::LUXURY_PRICE_THRESHOLD);
        assert!(Money::from_cents(8500) < crate::LUXURY_PRICE_THRESHOLD);
    }
}
