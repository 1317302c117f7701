//! # Automaton Info
//!
//! Structural summary of an automaton, the figures a caller checks before
//! and after epsilon-removal.

use crate::acyclic::is_eps_acyclic;
use crate::automaton::AutomatonStore;
use crate::proper::{is_proper, is_valid};
use crate::weightset::{StarStatus, WeightSet};
use crate::Label;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of transitions labeled `Label::One`.
pub fn num_spontaneous_transitions<A: AutomatonStore>(aut: &A) -> usize {
    aut.transitions()
        .into_iter()
        .filter(|t| aut.label_of(*t) == Some(Label::One))
        .count()
}

/// Counts and properties of one automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonInfo {
    pub weightset: String,
    pub star_status: StarStatus,
    pub num_states: usize,
    pub num_initial_states: usize,
    pub num_final_states: usize,
    /// Transitions between user states, spontaneous ones included.
    pub num_transitions: usize,
    pub num_spontaneous_transitions: usize,
    pub is_proper: bool,
    pub is_eps_acyclic: bool,
    /// Whether epsilon-removal is expected to succeed.
    pub is_valid: bool,
}

impl AutomatonInfo {
    /// Compute the summary of `aut`.
    ///
    /// `is_valid` may run a trial elimination for `Tops` and `AbsVal`
    /// weightsets.
    #[must_use]
    pub fn of<A: AutomatonStore>(aut: &A) -> Self {
        let num_spontaneous_transitions = num_spontaneous_transitions(aut);
        Self {
            weightset: aut.weightset().name().to_string(),
            star_status: aut.weightset().star_status(),
            num_states: aut.num_states(),
            num_initial_states: aut.initial_transitions().len(),
            num_final_states: aut.final_transitions().len(),
            num_transitions: aut.num_transitions(),
            num_spontaneous_transitions,
            is_proper: is_proper(aut),
            is_eps_acyclic: is_eps_acyclic(aut),
            is_valid: is_valid(aut),
        }
    }
}

impl fmt::Display for AutomatonInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "weightset: {} ({})", self.weightset, self.star_status)?;
        writeln!(f, "states: {}", self.num_states)?;
        writeln!(f, "initial states: {}", self.num_initial_states)?;
        writeln!(f, "final states: {}", self.num_final_states)?;
        writeln!(f, "transitions: {}", self.num_transitions)?;
        writeln!(
            f,
            "spontaneous transitions: {}",
            self.num_spontaneous_transitions
        )?;
        writeln!(f, "is proper: {}", self.is_proper)?;
        writeln!(f, "is eps-acyclic: {}", self.is_eps_acyclic)?;
        write!(f, "is valid: {}", self.is_valid)
    }
}
