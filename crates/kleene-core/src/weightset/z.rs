//! Integer weightset.

use super::{StarStatus, WeightSet};
use crate::KleeneError;

/// The ring of integers, with saturating arithmetic so that overflow never
/// panics. Only `0` is starable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Z;

impl WeightSet for Z {
    type Value = i64;

    const STAR_STATUS: StarStatus = StarStatus::NonStarable;

    fn name(&self) -> &'static str {
        "z"
    }

    fn zero(&self) -> i64 {
        0
    }

    fn one(&self) -> i64 {
        1
    }

    fn add(&self, l: &i64, r: &i64) -> i64 {
        l.saturating_add(*r)
    }

    fn mul(&self, l: &i64, r: &i64) -> i64 {
        l.saturating_mul(*r)
    }

    fn star(&self, v: &i64) -> Result<i64, KleeneError> {
        if *v == 0 {
            Ok(1)
        } else {
            Err(KleeneError::not_starable(self.name(), v))
        }
    }

    fn abs(&self, v: &i64) -> i64 {
        v.saturating_abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_is_defined_only_on_zero() {
        assert_eq!(Z.star(&0), Ok(1));
        assert!(Z.star(&-1).is_err());
        assert!(Z.star(&2).is_err());
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(Z.add(&i64::MAX, &1), i64::MAX);
        assert_eq!(Z.mul(&i64::MIN, &2), i64::MIN);
        assert_eq!(Z.abs(&-7), 7);
    }
}
