//! # kleene-core
//!
//! Weighted automata over pluggable semirings, and the removal of their
//! spontaneous transitions ("proper").
//!
//! Given an automaton whose transitions may carry the empty word
//! (`Label::One`), `remove_epsilons` builds an equivalent automaton without
//! such transitions, preserving the weight of every word.
//!
//! ## Layout
//!
//! - `types`, `primitives`: identifiers, labels, errors, reserved states
//! - `weightset`: the semirings and their star status
//! - `automaton`: the automaton store and its `BTreeMap` implementation
//! - `acyclic`, `split`, `profile`, `remover`: the elimination machinery
//! - `proper`: validity dispatch and entry points
//! - `transform`, `eval`, `info`: supporting algorithms
//!
//! ## Architectural Constraints
//!
//! - Deterministic: `BTreeMap`/`BTreeSet` only, ties broken by state id
//! - Synchronous and single-threaded, no I/O
//! - No floats: rational weights use integer arithmetic
//! - No process-wide state: verbosity lives in `ProperConfig`

// =============================================================================
// MODULES
// =============================================================================

pub mod acyclic;
pub mod automaton;
pub mod config;
pub mod eval;
pub mod info;
pub mod primitives;
pub mod profile;
pub mod proper;
pub mod remover;
pub mod split;
pub mod transform;
pub mod types;
pub mod weightset;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Direction, KleeneError, Label, StateId, Transition, TransitionId};

// =============================================================================
// RE-EXPORTS: Automata & Weightsets
// =============================================================================

pub use automaton::{AutomatonStore, MutableAutomaton, SerializableAutomaton};
pub use weightset::{B, F2, Q, Rational, StarStatus, WeightSet, Z, ZMin, ZMinValue};

// =============================================================================
// RE-EXPORTS: Epsilon Removal
// =============================================================================

pub use acyclic::is_eps_acyclic;
pub use config::{ProperAlgorithm, ProperConfig};
pub use profile::{EliminationQueue, EpsilonProfile};
pub use proper::{
    ProperPhase, Properer, ValidityCheck, is_proper, is_valid, remove_epsilons,
    remove_epsilons_in_place, remove_epsilons_in_place_with_config, remove_epsilons_with_config,
};
pub use remover::{EliminationStats, EpsilonRemover, InPlaceRemover};
pub use split::{Split, StateMap, split};

// =============================================================================
// RE-EXPORTS: Supporting Algorithms
// =============================================================================

pub use eval::evaluate;
pub use info::{AutomatonInfo, num_spontaneous_transitions};
pub use transform::{Copier, abs_copy, accessible, copy, is_accessible, transpose};
