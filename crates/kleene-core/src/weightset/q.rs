//! Rational weightset.

use super::{StarStatus, WeightSet};
use crate::KleeneError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rational number in lowest terms with a positive denominator.
///
/// Intermediate results are computed in `i128` and saturate when the reduced
/// result does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    num: i64,
    den: u64,
}

impl Rational {
    /// Build `num / den`, normalized. A zero denominator yields zero.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Self {
        Self::reduce(i128::from(num), i128::from(den))
    }

    #[must_use]
    pub const fn integer(num: i64) -> Self {
        Self { num, den: 1 }
    }

    #[must_use]
    pub const fn numerator(self) -> i64 {
        self.num
    }

    #[must_use]
    pub const fn denominator(self) -> u64 {
        self.den
    }

    fn reduce(num: i128, den: i128) -> Self {
        if num == 0 || den == 0 {
            return Self { num: 0, den: 1 };
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        let (num, den) = (num / g, den / g);
        Self {
            num: i64::try_from(num).unwrap_or(if num < 0 { i64::MIN } else { i64::MAX }),
            den: u64::try_from(den).unwrap_or(u64::MAX),
        }
    }

    fn parts(self) -> (i128, i128) {
        (i128::from(self.num), i128::from(self.den))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}

/// The field of rationals.
///
/// `v* = 1 / (1 - v)` exists iff `|v| < 1`. Validity of an elimination is
/// bounded by the automaton whose weights are replaced by their absolute
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Q;

impl WeightSet for Q {
    type Value = Rational;

    const STAR_STATUS: StarStatus = StarStatus::AbsVal;

    fn name(&self) -> &'static str {
        "q"
    }

    fn zero(&self) -> Rational {
        Rational::integer(0)
    }

    fn one(&self) -> Rational {
        Rational::integer(1)
    }

    fn add(&self, l: &Rational, r: &Rational) -> Rational {
        let ((ln, ld), (rn, rd)) = (l.parts(), r.parts());
        Rational::reduce(
            ln.saturating_mul(rd).saturating_add(rn.saturating_mul(ld)),
            ld.saturating_mul(rd),
        )
    }

    fn mul(&self, l: &Rational, r: &Rational) -> Rational {
        let ((ln, ld), (rn, rd)) = (l.parts(), r.parts());
        Rational::reduce(ln.saturating_mul(rn), ld.saturating_mul(rd))
    }

    fn star(&self, v: &Rational) -> Result<Rational, KleeneError> {
        let (num, den) = v.parts();
        if num.abs() < den {
            Ok(Rational::reduce(den, den - num))
        } else {
            Err(KleeneError::not_starable(self.name(), v.to_string()))
        }
    }

    fn abs(&self, v: &Rational) -> Rational {
        Rational {
            num: v.num.saturating_abs(),
            den: v.den,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_normalized() {
        assert_eq!(Rational::new(2, 4), Rational::new(1, 2));
        assert_eq!(Rational::new(1, -2), Rational::new(-1, 2));
        assert_eq!(Rational::new(0, 7), Q.zero());
        assert_eq!(Rational::new(-3, 6).to_string(), "-1/2");
    }

    #[test]
    fn field_arithmetic() {
        let half = Rational::new(1, 2);
        let third = Rational::new(1, 3);
        assert_eq!(Q.add(&half, &third), Rational::new(5, 6));
        assert_eq!(Q.mul(&half, &third), Rational::new(1, 6));
        assert_eq!(Q.add(&half, &Rational::new(-1, 2)), Q.zero());
    }

    #[test]
    fn star_requires_absolute_value_below_one() {
        assert_eq!(Q.star(&Rational::new(1, 2)), Ok(Rational::integer(2)));
        assert_eq!(Q.star(&Rational::new(-1, 2)), Ok(Rational::new(2, 3)));
        assert!(Q.star(&Q.one()).is_err());
        assert!(Q.star(&Rational::integer(-1)).is_err());
        assert!(Q.star(&Rational::integer(2)).is_err());
    }

    #[test]
    fn abs_drops_the_sign() {
        assert_eq!(Q.abs(&Rational::new(-3, 4)), Rational::new(3, 4));
    }
}
