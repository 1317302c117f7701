//! Tropical min-plus weightset over the integers.

use super::{StarStatus, WeightSet};
use crate::KleeneError;
use serde::{Deserialize, Serialize};

/// A weight of [`ZMin`]: an integer or `+∞` (the semiring zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZMinValue {
    Finite(i64),
    Infinity,
}

/// The tropical semiring `(Z ∪ {∞}, min, +)`.
///
/// `v* = 0` for `v ≥ 0`; a negative loop has no star. Totality cannot be
/// decided from the status alone, so validity is tested by trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZMin;

impl WeightSet for ZMin {
    type Value = ZMinValue;

    const STAR_STATUS: StarStatus = StarStatus::Tops;

    fn name(&self) -> &'static str {
        "zmin"
    }

    fn zero(&self) -> ZMinValue {
        ZMinValue::Infinity
    }

    fn one(&self) -> ZMinValue {
        ZMinValue::Finite(0)
    }

    fn add(&self, l: &ZMinValue, r: &ZMinValue) -> ZMinValue {
        *l.min(r)
    }

    fn mul(&self, l: &ZMinValue, r: &ZMinValue) -> ZMinValue {
        match (l, r) {
            (ZMinValue::Finite(a), ZMinValue::Finite(b)) => ZMinValue::Finite(a.saturating_add(*b)),
            _ => ZMinValue::Infinity,
        }
    }

    fn star(&self, v: &ZMinValue) -> Result<ZMinValue, KleeneError> {
        match v {
            ZMinValue::Finite(n) if *n < 0 => Err(KleeneError::not_starable(self.name(), n)),
            _ => Ok(self.one()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_plus_arithmetic() {
        let three = ZMinValue::Finite(3);
        let five = ZMinValue::Finite(5);
        assert_eq!(ZMin.add(&three, &five), three);
        assert_eq!(ZMin.mul(&three, &five), ZMinValue::Finite(8));
        assert_eq!(ZMin.add(&ZMin.zero(), &five), five);
        assert_eq!(ZMin.mul(&ZMin.zero(), &five), ZMin.zero());
    }

    #[test]
    fn star_rejects_negative_loops() {
        assert_eq!(ZMin.star(&ZMinValue::Finite(2)), Ok(ZMinValue::Finite(0)));
        assert_eq!(ZMin.star(&ZMinValue::Infinity), Ok(ZMinValue::Finite(0)));
        assert!(ZMin.star(&ZMinValue::Finite(-1)).is_err());
    }
}
