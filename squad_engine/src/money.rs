/// SquadEngine: Money Primitives
///
/// All currency values: i64 fixed-point (SCALE = 10, one decimal place).
/// No float arithmetic on the rule path. Floats only appear at the JSON edge.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Fixed-point scale factor. A price of 9.5 is stored as `95`.
pub const SCALE: i64 = 10;

/// A currency amount in tenths of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_tenths(tenths: i64) -> Self {
        Money(tenths)
    }

    pub const fn from_units(units: i64) -> Self {
        Money(units * SCALE)
    }

    /// Convert a decimal amount, rounding to the nearest tenth.
    /// Returns `None` for NaN, infinities and out-of-range values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * SCALE as f64).round();
        if scaled.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Money(scaled as i64))
    }

    /// Like `from_f64`, but refuses amounts that are not a whole number
    /// of tenths (5.55 is rejected rather than rounded).
    pub fn from_f64_exact(value: f64) -> Option<Self> {
        let money = Self::from_f64(value)?;
        if (value * SCALE as f64 - money.0 as f64).abs() > 1e-6 {
            return None;
        }
        Some(money)
    }

    pub const fn tenths(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<f64> for Money {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Money::from_f64_exact(value)
            .ok_or_else(|| format!("invalid money amount {}: expected a whole number of tenths", value))
    }
}

impl From<Money> for f64 {
    fn from(m: Money) -> f64 {
        m.as_f64()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / SCALE as u64, abs % SCALE as u64)
    }
}

// Sums saturate at the i64 bounds. A saturated total is far over any
// budget, so every budget check still fails closed instead of panicking.

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
