//! # Weightsets
//!
//! The semirings that weight automaton transitions.
//!
//! A weightset provides `zero`, `one`, `add`, `mul`, a possibly partial Kleene
//! `star`, an optional absolute value, and a constant [`StarStatus`] that tells
//! the epsilon-removal dispatcher how much it can trust `star`.
//!
//! | Weightset | Values | Star status |
//! |-----------|--------|-------------|
//! | [`B`] | booleans, `or`/`and` | `Starable` |
//! | [`F2`] | booleans, `xor`/`and` | `NonStarable` |
//! | [`Z`] | integers | `NonStarable` |
//! | [`Q`] | rationals | `AbsVal` |
//! | [`ZMin`] | tropical min-plus integers | `Tops` |

mod b;
mod f2;
mod q;
mod z;
mod zmin;

pub use b::B;
pub use f2::F2;
pub use q::{Q, Rational};
pub use z::Z;
pub use zmin::{ZMin, ZMinValue};

use crate::KleeneError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// STAR STATUS
// =============================================================================

/// Classification of a weightset by the totality of its Kleene star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StarStatus {
    /// The star of every weight is defined.
    Starable,
    /// No totality guarantee; validity is tested by a trial elimination.
    Tops,
    /// The star is undefined whenever a cycle actually needs it; validity
    /// reduces to epsilon-acyclicity (sound only without zero divisors).
    NonStarable,
    /// Cancellative weights; validity is tested on the automaton whose
    /// weights are replaced by their absolute value.
    AbsVal,
}

impl StarStatus {
    /// Whether elimination under this status may skip the validity pre-check.
    #[must_use]
    pub const fn skips_validation(self) -> bool {
        matches!(self, StarStatus::Starable)
    }
}

impl fmt::Display for StarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StarStatus::Starable => "starable",
            StarStatus::Tops => "tops",
            StarStatus::NonStarable => "non_starable",
            StarStatus::AbsVal => "absval",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// WEIGHTSET TRAIT
// =============================================================================

/// A semiring of transition weights.
///
/// Implementations are small `Copy` handles; the values they operate on are
/// [`WeightSet::Value`].
pub trait WeightSet: Clone + fmt::Debug {
    /// The weights themselves.
    type Value: Clone + PartialEq + fmt::Debug;

    /// How far `star` can be trusted.
    const STAR_STATUS: StarStatus;

    /// Short name of the weightset, used in error messages.
    fn name(&self) -> &'static str;

    /// Neutral element of `add`, absorbing for `mul`.
    fn zero(&self) -> Self::Value;

    /// Neutral element of `mul`.
    fn one(&self) -> Self::Value;

    fn add(&self, l: &Self::Value, r: &Self::Value) -> Self::Value;

    fn mul(&self, l: &Self::Value, r: &Self::Value) -> Self::Value;

    /// The Kleene star `v* = 1 + v + v² + ...`, when it exists.
    fn star(&self, v: &Self::Value) -> Result<Self::Value, KleeneError>;

    /// Absolute value. Only meaningful for `AbsVal` weightsets.
    fn abs(&self, v: &Self::Value) -> Self::Value {
        v.clone()
    }

    /// Weight of the mirrored transition in a transposed automaton.
    fn transpose(&self, v: &Self::Value) -> Self::Value {
        v.clone()
    }

    fn is_zero(&self, v: &Self::Value) -> bool {
        *v == self.zero()
    }

    fn is_one(&self, v: &Self::Value) -> bool {
        *v == self.one()
    }

    /// The star status of this weightset, as a value.
    fn star_status(&self) -> StarStatus {
        Self::STAR_STATUS
    }
}

// =============================================================================
// TESTS
// =============================================================================
