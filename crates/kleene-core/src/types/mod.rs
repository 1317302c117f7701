//! # Core Type Definitions
//!
//! This module contains the core types shared by every kleene algorithm:
//! - State and transition identifiers (`StateId`, `TransitionId`)
//! - Transition labels (`Label`)
//! - Transition records (`Transition`)
//! - Direction of elimination (`Direction`)
//! - Error types (`KleeneError`)
//!
//! ## Determinism Guarantees
//!
//! All identifiers and labels implement `Ord` so that automata can be stored
//! in `BTreeMap`/`BTreeSet` and iterated in a reproducible order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// STATE & TRANSITION IDENTIFIERS
// =============================================================================

/// Identifier of a state inside one automaton.
///
/// Identifiers are local to the automaton that allocated them; a copy of an
/// automaton may renumber its states (see `transform::Copier`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub u64);

impl StateId {
    /// Index of this state in a dense array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a transition inside one automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

// =============================================================================
// LABELS
// =============================================================================

/// Label carried by a transition.
///
/// `One` is the identity of the label monoid (the empty word): a transition
/// labeled `One` is *spontaneous* and consumes no input. `Special` labels the
/// arrows from the pre-initial state and to the post-final state, which encode
/// initial and final weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    /// The empty word.
    One,
    /// A single letter.
    Letter(char),
    /// Initial/final arrow marker.
    Special,
}

impl Label {
    /// Whether this label is the identity (a spontaneous move).
    #[must_use]
    pub const fn is_one(self) -> bool {
        matches!(self, Label::One)
    }

    /// Whether this label marks an initial or final arrow.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, Label::Special)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::One => write!(f, "\\e"),
            Label::Letter(c) => write!(f, "{c}"),
            Label::Special => write!(f, "$"),
        }
    }
}

// =============================================================================
// TRANSITION
// =============================================================================

/// A weighted, labeled transition between two states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition<V> {
    pub src: StateId,
    pub dst: StateId,
    pub label: Label,
    pub weight: V,
}

impl<V> Transition<V> {
    #[must_use]
    pub fn new(src: StateId, dst: StateId, label: Label, weight: V) -> Self {
        Self {
            src,
            dst,
            label,
            weight,
        }
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Direction in which spontaneous transitions are eliminated.
///
/// `Forward` folds each spontaneous transition into the transitions leaving
/// its destination. `Backward` runs the forward algorithm on the transposed
/// automaton and transposes the result back.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in kleene algorithms.
///
/// - No silent failures
/// - Use `Result<T, KleeneError>` for fallible operations
/// - Library code never panics; star failures propagate to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KleeneError {
    /// The Kleene star of a weight does not exist in its weightset.
    #[error("{weightset}: star: invalid value: {value}")]
    NotStarable {
        weightset: &'static str,
        value: String,
    },

    /// A pre-check determined that an algorithm cannot succeed on the input.
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),

    /// The requested state does not exist in the automaton.
    #[error("State not found: {0:?}")]
    StateNotFound(StateId),

    /// The requested transition does not exist in the automaton.
    #[error("Transition not found: {0:?}")]
    TransitionNotFound(TransitionId),
}

impl KleeneError {
    /// Build a `NotStarable` error for `value` in the weightset `weightset`.
    pub fn not_starable(weightset: &'static str, value: impl fmt::Debug) -> Self {
        Self::NotStarable {
            weightset,
            value: format!("{value:?}"),
        }
    }

    /// Whether this error reports a missing Kleene star.
    #[must_use]
    pub const fn is_not_starable(&self) -> bool {
        matches!(self, Self::NotStarable { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
