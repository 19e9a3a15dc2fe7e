//! Monetary amounts in integer cents
//!
//! Every price and total in the engine flows through [`Money`] so that
//! accumulation stays exact; floating point only appears at the display
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A monetary amount stored as integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount
    pub const ZERO: Money = Money(0);

    /// Create from integer cents (the catalog and checkout wire unit)
    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Create from a decimal major-unit amount, rounded to the nearest cent
    pub fn from_major(major: f64) -> Self {
        Money((major * 100.0).round() as i64)
    }

    /// Amount in cents
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Amount in major currency units, exact to two decimal places
    pub fn major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Amount rounded to the nearest integer major unit
    pub fn round_major(&self) -> i64 {
        self.major().round() as i64
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}
