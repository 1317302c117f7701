//! Boolean weightset: `or` as addition, `and` as multiplication.

use super::{StarStatus, WeightSet};
use crate::KleeneError;

/// The Boolean semiring. Every weight is starable: `b* = true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct B;

impl WeightSet for B {
    type Value = bool;

    const STAR_STATUS: StarStatus = StarStatus::Starable;

    fn name(&self) -> &'static str {
        "b"
    }

    fn zero(&self) -> bool {
        false
    }

    fn one(&self) -> bool {
        true
    }

    fn add(&self, l: &bool, r: &bool) -> bool {
        *l || *r
    }

    fn mul(&self, l: &bool, r: &bool) -> bool {
        *l && *r
    }

    fn star(&self, _v: &bool) -> Result<bool, KleeneError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_is_total() {
        assert_eq!(B.star(&false), Ok(true));
        assert_eq!(B.star(&true), Ok(true));
    }

    #[test]
    fn add_is_idempotent() {
        assert!(B.add(&true, &true));
        assert!(!B.add(&false, &false));
        assert!(!B.mul(&true, &false));
    }
}
