//! # Automaton Splitter
//!
//! Separates an automaton into the two graphs the eliminator works on:
//!
//! - the **spontaneous graph**: only `Label::One` transitions, and only the
//!   states touching at least one of them;
//! - the **proper graph**: every state, every other transition, initial and
//!   final arrows included.
//!
//! Both graphs are fresh automata with their own numbering; two dense
//! `StateMap`s translate between them.

use crate::automaton::{AutomatonStore, MutableAutomaton};
use crate::primitives::{NULL_STATE, is_hidden};
use crate::transform::Copier;
use crate::weightset::WeightSet;
use crate::{KleeneError, Label, StateId};

// =============================================================================
// STATE MAP
// =============================================================================

/// Dense map from the states of one graph to the states of another.
///
/// Absent entries hold `NULL_STATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMap(Vec<StateId>);

impl StateMap {
    /// A map of `size` entries, all absent.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self(vec![NULL_STATE; size])
    }

    /// The image of `state`, if any.
    #[must_use]
    pub fn get(&self, state: StateId) -> Option<StateId> {
        self.0
            .get(state.index())
            .copied()
            .filter(|s| *s != NULL_STATE)
    }

    /// The image of `state`, or `NULL_STATE`.
    #[must_use]
    pub fn get_or_null(&self, state: StateId) -> StateId {
        self.get(state).unwrap_or(NULL_STATE)
    }

    pub fn set(&mut self, from: StateId, to: StateId) {
        let index = from.index();
        if index >= self.0.len() {
            self.0.resize(index.saturating_add(1), NULL_STATE);
        }
        self.0[index] = to;
    }

    pub fn clear(&mut self, from: StateId) {
        if let Some(slot) = self.0.get_mut(from.index()) {
            *slot = NULL_STATE;
        }
    }

    /// Number of slots (present or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Present `(from, to)` pairs in ascending `from` order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, to)| **to != NULL_STATE)
            .map(|(from, to)| (StateId(from as u64), *to))
    }
}

// =============================================================================
// SPLIT
// =============================================================================

/// The spontaneous and proper halves of an automaton.
#[derive(Debug, Clone)]
pub struct Split<W: WeightSet> {
    /// `Label::One` transitions only.
    pub spontaneous: MutableAutomaton<W>,
    /// Everything else.
    pub proper: MutableAutomaton<W>,
    pub proper_to_spontaneous: StateMap,
    pub spontaneous_to_proper: StateMap,
}

impl<W: WeightSet> Split<W> {
    /// Whether the two maps are mutual inverses wherever both are present.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.spontaneous_to_proper
            .iter()
            .all(|(d, p)| self.proper_to_spontaneous.get(p) == Some(d))
            && self
                .proper_to_spontaneous
                .iter()
                .all(|(p, d)| self.spontaneous_to_proper.get(d) == Some(p))
    }
}

/// Split `aut` into its spontaneous and proper graphs.
pub fn split<A: AutomatonStore>(aut: &A) -> Result<Split<A::Weights>, KleeneError> {
    let ws = aut.weightset().clone();
    let mut proper = MutableAutomaton::new(ws.clone());
    let mut spontaneous = MutableAutomaton::new(ws);

    let mut proper_copier = Copier::new(aut);
    proper_copier.copy_into(&mut proper, |_| true, |tr| !tr.label.is_one())?;

    let mut spontaneous_copier = Copier::new(aut);
    spontaneous_copier.copy_into(
        &mut spontaneous,
        |s| !aut.in_with(s, Label::One).is_empty() || !aut.out_with(s, Label::One).is_empty(),
        |tr| tr.label.is_one(),
    )?;

    let bound = aut.state_bound();
    let mut proper_to_spontaneous = StateMap::new(bound);
    let mut spontaneous_to_proper = StateMap::new(bound);
    let proper_origins = proper_copier.state_map();
    for (&origin, &d) in spontaneous_copier.state_map() {
        if is_hidden(origin) {
            continue;
        }
        let &p = proper_origins
            .get(&origin)
            .ok_or(KleeneError::StateNotFound(origin))?;
        spontaneous_to_proper.set(d, p);
        proper_to_spontaneous.set(p, d);
    }

    Ok(Split {
        spontaneous,
        proper,
        proper_to_spontaneous,
        spontaneous_to_proper,
    })
}

// =============================================================================
// TESTS
// =============================================================================
