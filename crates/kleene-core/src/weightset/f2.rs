//! The two-element field: `xor` as addition, `and` as multiplication.

use super::{StarStatus, WeightSet};
use crate::KleeneError;

/// GF(2). Only `0` is starable (`0* = 1`); `1* = 1 + 1 + ...` diverges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct F2;

impl WeightSet for F2 {
    type Value = bool;

    const STAR_STATUS: StarStatus = StarStatus::NonStarable;

    fn name(&self) -> &'static str {
        "f2"
    }

    fn zero(&self) -> bool {
        false
    }

    fn one(&self) -> bool {
        true
    }

    fn add(&self, l: &bool, r: &bool) -> bool {
        l ^ r
    }

    fn mul(&self, l: &bool, r: &bool) -> bool {
        *l && *r
    }

    fn star(&self, v: &bool) -> Result<bool, KleeneError> {
        if *v {
            Err(KleeneError::not_starable(self.name(), 1))
        } else {
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_plus_one_is_zero() {
        assert!(!F2.add(&true, &true));
    }

    #[test]
    fn star_of_one_fails() {
        assert!(F2.star(&true).is_err());
        assert_eq!(F2.star(&false), Ok(true));
    }
}
