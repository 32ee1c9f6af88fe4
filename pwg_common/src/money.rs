use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------      Money       ------------------------------------------------------------
/// A monetary amount in integer minor units (cents).
///
/// Amounts are signed so that deltas can be expressed, but wallet balances are kept non-negative by
/// the ledger operations themselves.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl TryFrom<u64> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MoneyConversionError(format!("Value {value} is too large to convert to Money")))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cents = self.0.abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Money::from(1_000);
        let b = Money::from(250);
        assert_eq!(a + b, Money::from(1_250));
        assert_eq!(a - b, Money::from(750));
        assert_eq!(-b, Money::from(-250));
        let mut c = a;
        c -= b;
        assert_eq!(c, Money::from(750));
        assert_eq!(b * 4, a);
        assert_eq!([a, b, b].into_iter().sum::<Money>(), Money::from(1_500));
    }

    #[test]
    fn display_uses_major_and_minor_units() {
        assert_eq!(Money::from(12_345).to_string(), "123.45");
        assert_eq!(Money::from(5).to_string(), "0.05");
        assert_eq!(Money::from(-150).to_string(), "-1.50");
        assert_eq!(Money::from(-50).to_string(), "-0.50");
    }

    #[test]
    fn positivity() {
        assert!(Money::from(1).is_positive());
        assert!(!Money::from(0).is_positive());
        assert!(!Money::from(-1).is_positive());
    }
}
