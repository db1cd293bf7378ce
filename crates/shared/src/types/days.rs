//! Day quantity with two-decimal precision.
//!
//! CRITICAL: Never use floating-point for ledger counters.
//! This type wraps `rust_decimal::Decimal`, the same way every balance column is stored.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of decimal places a day quantity may carry.
pub const DAYS_SCALE: u32 = 2;

/// Errors raised when building a `Days` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaysError {
    /// The value carries more than two decimal places.
    #[error("Day quantity {0} has more than {DAYS_SCALE} decimal places")]
    TooPrecise(Decimal),
}

/// A signed number of days.
///
/// Ledger counters (`total`, `used`, `pending`) and adjustment deltas are all `Days`.
/// Arithmetic is exact; negative values are representable because the derived
/// remaining balance may legitimately go below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Days(Decimal);

impl Days {
    /// Zero days.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a day quantity, rejecting values finer than hundredths.
    pub fn new(value: Decimal) -> Result<Self, DaysError> {
        let normalized = value.normalize();
        if normalized.scale() > DAYS_SCALE {
            return Err(DaysError::TooPrecise(value));
        }
        Ok(Self(normalized))
    }

    /// Creates a whole number of days.
    #[must_use]
    pub fn whole(days: i64) -> Self {
        Self(Decimal::from(days))
    }

    /// Wraps a decimal read back from storage, rounding to two places.
    #[must_use]
    pub fn from_stored(value: Decimal) -> Self {
        Self(value.round_dp(DAYS_SCALE).normalize())
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the quantity is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the quantity is strictly negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if the quantity is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Days {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Days {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Days {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Days {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Days {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl std::iter::Sum for Days {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
