//! # Automaton Store
//!
//! The deterministic weighted-automaton storage for kleene.
//!
//! This module defines the `AutomatonStore` capability consumed by every
//! algorithm and implements it with `MutableAutomaton`.
//! All data structures use `BTreeMap` for deterministic ordering.
//!
//! Initial and final weights are stored as `Label::Special` transitions
//! leaving `PRE_STATE` and entering `POST_STATE` respectively, so the
//! `all_in`/`all_out` views of a state include them while the plain
//! `in_transitions`/`out_transitions` views do not.

use crate::primitives::{FIRST_STATE, POST_STATE, PRE_STATE, is_hidden};
use crate::weightset::WeightSet;
use crate::{KleeneError, Label, StateId, Transition, TransitionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// AUTOMATONSTORE TRAIT
// =============================================================================

/// The AutomatonStore trait defines the operations algorithms rely on.
///
/// Transition lists are returned as owned vectors in ascending
/// `TransitionId` order so that callers may mutate the automaton while
/// walking a list they obtained earlier.
pub trait AutomatonStore {
    /// The weightset of the transitions.
    type Weights: WeightSet;

    /// Get the weightset.
    fn weightset(&self) -> &Self::Weights;

    /// Create a fresh state.
    fn new_state(&mut self) -> StateId;

    /// Delete a state and every transition touching it.
    fn del_state(&mut self, state: StateId) -> Result<(), KleeneError>;

    /// Check if a (non-hidden) state exists.
    fn has_state(&self, state: StateId) -> bool;

    /// All non-hidden states, in ascending order.
    fn states(&self) -> Vec<StateId>;

    /// One more than the largest state identifier ever allocated.
    fn state_bound(&self) -> usize;

    /// Get a transition by id.
    fn transition(&self, t: TransitionId) -> Option<&Transition<<Self::Weights as WeightSet>::Value>>;

    /// All transitions between non-hidden states.
    fn transitions(&self) -> Vec<TransitionId>;

    /// Find the transition `src --label--> dst`, if any.
    fn get_transition(&self, src: StateId, dst: StateId, label: Label) -> Option<TransitionId>;

    /// Add `weight` to the transition `src --label--> dst`, creating it if needed.
    ///
    /// Returns the transition id, or `None` when the accumulated weight is zero
    /// (in which case the transition no longer exists).
    fn add_transition(
        &mut self,
        src: StateId,
        dst: StateId,
        label: Label,
        weight: <Self::Weights as WeightSet>::Value,
    ) -> Result<Option<TransitionId>, KleeneError>;

    /// Set the weight of `src --label--> dst`, overwriting any previous weight.
    fn set_transition(
        &mut self,
        src: StateId,
        dst: StateId,
        label: Label,
        weight: <Self::Weights as WeightSet>::Value,
    ) -> Result<Option<TransitionId>, KleeneError>;

    /// Delete a transition.
    fn del_transition(&mut self, t: TransitionId) -> Result<(), KleeneError>;

    /// Overwrite the weight of a transition; a zero weight deletes it.
    fn set_weight(
        &mut self,
        t: TransitionId,
        weight: <Self::Weights as WeightSet>::Value,
    ) -> Result<(), KleeneError>;

    /// Incoming transitions, including the initial arrow.
    fn all_in(&self, state: StateId) -> Vec<TransitionId>;

    /// Outgoing transitions, including the final arrow.
    fn all_out(&self, state: StateId) -> Vec<TransitionId>;

    // -------------------------------------------------------------------------
    // Provided methods
    // -------------------------------------------------------------------------

    /// Incoming transitions, excluding the initial arrow.
    fn in_transitions(&self, state: StateId) -> Vec<TransitionId> {
        self.all_in(state)
            .into_iter()
            .filter(|&t| self.src_of(t) != Some(PRE_STATE))
            .collect()
    }

    /// Outgoing transitions, excluding the final arrow.
    fn out_transitions(&self, state: StateId) -> Vec<TransitionId> {
        self.all_out(state)
            .into_iter()
            .filter(|&t| self.dst_of(t) != Some(POST_STATE))
            .collect()
    }

    /// Incoming transitions carrying `label`.
    fn in_with(&self, state: StateId, label: Label) -> Vec<TransitionId> {
        self.in_transitions(state)
            .into_iter()
            .filter(|&t| self.label_of(t) == Some(label))
            .collect()
    }

    /// Outgoing transitions carrying `label`.
    fn out_with(&self, state: StateId, label: Label) -> Vec<TransitionId> {
        self.out_transitions(state)
            .into_iter()
            .filter(|&t| self.label_of(t) == Some(label))
            .collect()
    }

    fn src_of(&self, t: TransitionId) -> Option<StateId> {
        self.transition(t).map(|tr| tr.src)
    }

    fn dst_of(&self, t: TransitionId) -> Option<StateId> {
        self.transition(t).map(|tr| tr.dst)
    }

    fn label_of(&self, t: TransitionId) -> Option<Label> {
        self.transition(t).map(|tr| tr.label)
    }

    fn weight_of(&self, t: TransitionId) -> Option<<Self::Weights as WeightSet>::Value> {
        self.transition(t).map(|tr| tr.weight.clone())
    }

    /// Number of non-hidden states.
    fn num_states(&self) -> usize {
        self.states().len()
    }

    /// Number of transitions between non-hidden states.
    fn num_transitions(&self) -> usize {
        self.transitions().len()
    }

    fn set_initial(
        &mut self,
        state: StateId,
        weight: <Self::Weights as WeightSet>::Value,
    ) -> Result<(), KleeneError> {
        self.set_transition(PRE_STATE, state, Label::Special, weight)
            .map(|_| ())
    }

    fn add_initial(
        &mut self,
        state: StateId,
        weight: <Self::Weights as WeightSet>::Value,
    ) -> Result<(), KleeneError> {
        self.add_transition(PRE_STATE, state, Label::Special, weight)
            .map(|_| ())
    }

    fn set_final(
        &mut self,
        state: StateId,
        weight: <Self::Weights as WeightSet>::Value,
    ) -> Result<(), KleeneError> {
        self.set_transition(state, POST_STATE, Label::Special, weight)
            .map(|_| ())
    }

    fn add_final(
        &mut self,
        state: StateId,
        weight: <Self::Weights as WeightSet>::Value,
    ) -> Result<(), KleeneError> {
        self.add_transition(state, POST_STATE, Label::Special, weight)
            .map(|_| ())
    }

    /// Initial weight of a state (zero if not initial).
    fn initial_weight(&self, state: StateId) -> <Self::Weights as WeightSet>::Value {
        self.get_transition(PRE_STATE, state, Label::Special)
            .and_then(|t| self.weight_of(t))
            .unwrap_or_else(|| self.weightset().zero())
    }

    /// Final weight of a state (zero if not final).
    fn final_weight(&self, state: StateId) -> <Self::Weights as WeightSet>::Value {
        self.get_transition(state, POST_STATE, Label::Special)
            .and_then(|t| self.weight_of(t))
            .unwrap_or_else(|| self.weightset().zero())
    }

    fn is_initial(&self, state: StateId) -> bool {
        self.get_transition(PRE_STATE, state, Label::Special)
            .is_some()
    }

    fn is_final(&self, state: StateId) -> bool {
        self.get_transition(state, POST_STATE, Label::Special)
            .is_some()
    }

    /// The initial arrows.
    fn initial_transitions(&self) -> Vec<TransitionId> {
        self.all_out(PRE_STATE)
    }

    /// The final arrows.
    fn final_transitions(&self) -> Vec<TransitionId> {
        self.all_in(POST_STATE)
    }
}

// =============================================================================
// MUTABLE AUTOMATON
// =============================================================================

/// Per-state adjacency.
#[derive(Debug, Clone, Default)]
struct StateData {
    ins: BTreeSet<TransitionId>,
    outs: BTreeSet<TransitionId>,
}

/// The main automaton structure.
///
/// Uses `BTreeMap` exclusively for deterministic ordering.
/// At most one transition exists per `(src, dst, label)` triple; adding a
/// parallel transition accumulates into the existing weight.
#[derive(Debug, Clone)]
pub struct MutableAutomaton<W: WeightSet> {
    ws: W,

    /// State storage, including the two hidden states.
    states: BTreeMap<StateId, StateData>,

    /// Transition storage: TransitionId -> Transition
    transitions: BTreeMap<TransitionId, Transition<W::Value>>,

    /// Reverse lookup: (src, dst, label) -> TransitionId
    index: BTreeMap<(StateId, StateId, Label), TransitionId>,

    /// Next available StateId
    next_state: u64,

    /// Next available TransitionId
    next_transition: u64,
}

impl<W: WeightSet> MutableAutomaton<W> {
    /// Create an empty automaton over `ws`.
    #[must_use]
    pub fn new(ws: W) -> Self {
        let mut states = BTreeMap::new();
        states.insert(PRE_STATE, StateData::default());
        states.insert(POST_STATE, StateData::default());
        Self {
            ws,
            states,
            transitions: BTreeMap::new(),
            index: BTreeMap::new(),
            next_state: FIRST_STATE.0,
            next_transition: 0,
        }
    }

    /// Create `count` fresh states and return them in allocation order.
    pub fn new_states(&mut self, count: usize) -> Vec<StateId> {
        (0..count).map(|_| self.new_state()).collect()
    }

    /// Reconstruct an automaton from a snapshot, preserving state ids.
    pub fn from_serializable(
        ws: W,
        snapshot: SerializableAutomaton<W::Value>,
    ) -> Result<Self, KleeneError> {
        let mut aut = Self::new(ws);
        for state in snapshot.states {
            aut.import_state(state);
        }
        aut.next_state = aut.next_state.max(snapshot.next_state);
        for tr in snapshot.transitions {
            aut.add_transition(tr.src, tr.dst, tr.label, tr.weight)?;
        }
        Ok(aut)
    }

    /// Insert a state with a given id (for snapshot restoration).
    fn import_state(&mut self, state: StateId) {
        if is_hidden(state) {
            return;
        }
        if state.0 >= self.next_state {
            self.next_state = state.0.saturating_add(1);
        }
        self.states.entry(state).or_default();
    }

    /// Every transition, including initial and final arrows.
    pub fn all_transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition<W::Value>)> + '_ {
        self.transitions.iter().map(|(id, tr)| (*id, tr))
    }

    fn check_state(&self, state: StateId) -> Result<(), KleeneError> {
        if self.states.contains_key(&state) {
            Ok(())
        } else {
            Err(KleeneError::StateNotFound(state))
        }
    }

    fn create_transition(
        &mut self,
        src: StateId,
        dst: StateId,
        label: Label,
        weight: W::Value,
    ) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition = self.next_transition.saturating_add(1);
        if let Some(data) = self.states.get_mut(&src) {
            data.outs.insert(id);
        }
        if let Some(data) = self.states.get_mut(&dst) {
            data.ins.insert(id);
        }
        self.index.insert((src, dst, label), id);
        self.transitions
            .insert(id, Transition::new(src, dst, label, weight));
        id
    }
}

impl<W: WeightSet> AutomatonStore for MutableAutomaton<W> {
    type Weights = W;

    fn weightset(&self) -> &W {
        &self.ws
    }

    fn new_state(&mut self) -> StateId {
        let id = StateId(self.next_state);
        self.next_state = self.next_state.saturating_add(1);
        self.states.insert(id, StateData::default());
        id
    }

    fn del_state(&mut self, state: StateId) -> Result<(), KleeneError> {
        if is_hidden(state) {
            return Err(KleeneError::InvalidAutomaton(format!(
                "cannot delete hidden state {state}"
            )));
        }
        let Some(data) = self.states.get(&state) else {
            return Err(KleeneError::StateNotFound(state));
        };
        let incident: BTreeSet<TransitionId> = data.ins.union(&data.outs).copied().collect();
        for t in incident {
            self.del_transition(t)?;
        }
        self.states.remove(&state);
        Ok(())
    }

    fn has_state(&self, state: StateId) -> bool {
        !is_hidden(state) && self.states.contains_key(&state)
    }

    fn states(&self) -> Vec<StateId> {
        self.states
            .keys()
            .copied()
            .filter(|s| !is_hidden(*s))
            .collect()
    }

    fn state_bound(&self) -> usize {
        self.next_state as usize
    }

    fn transition(&self, t: TransitionId) -> Option<&Transition<W::Value>> {
        self.transitions.get(&t)
    }

    fn transitions(&self) -> Vec<TransitionId> {
        self.transitions
            .iter()
            .filter(|(_, tr)| tr.src != PRE_STATE && tr.dst != POST_STATE)
            .map(|(id, _)| *id)
            .collect()
    }

    fn get_transition(&self, src: StateId, dst: StateId, label: Label) -> Option<TransitionId> {
        self.index.get(&(src, dst, label)).copied()
    }

    fn add_transition(
        &mut self,
        src: StateId,
        dst: StateId,
        label: Label,
        weight: W::Value,
    ) -> Result<Option<TransitionId>, KleeneError> {
        self.check_state(src)?;
        self.check_state(dst)?;
        match self.get_transition(src, dst, label) {
            Some(t) => {
                let current = self
                    .weight_of(t)
                    .ok_or(KleeneError::TransitionNotFound(t))?;
                let sum = self.ws.add(&current, &weight);
                self.set_weight(t, sum)?;
                Ok(self.transitions.contains_key(&t).then_some(t))
            }
            None if self.ws.is_zero(&weight) => Ok(None),
            None => Ok(Some(self.create_transition(src, dst, label, weight))),
        }
    }

    fn set_transition(
        &mut self,
        src: StateId,
        dst: StateId,
        label: Label,
        weight: W::Value,
    ) -> Result<Option<TransitionId>, KleeneError> {
        self.check_state(src)?;
        self.check_state(dst)?;
        match self.get_transition(src, dst, label) {
            Some(t) => {
                self.set_weight(t, weight)?;
                Ok(self.transitions.contains_key(&t).then_some(t))
            }
            None if self.ws.is_zero(&weight) => Ok(None),
            None => Ok(Some(self.create_transition(src, dst, label, weight))),
        }
    }

    fn del_transition(&mut self, t: TransitionId) -> Result<(), KleeneError> {
        let tr = self
            .transitions
            .remove(&t)
            .ok_or(KleeneError::TransitionNotFound(t))?;
        if let Some(data) = self.states.get_mut(&tr.src) {
            data.outs.remove(&t);
        }
        if let Some(data) = self.states.get_mut(&tr.dst) {
            data.ins.remove(&t);
        }
        self.index.remove(&(tr.src, tr.dst, tr.label));
        Ok(())
    }

    fn set_weight(&mut self, t: TransitionId, weight: W::Value) -> Result<(), KleeneError> {
        if self.ws.is_zero(&weight) {
            return self.del_transition(t);
        }
        let tr = self
            .transitions
            .get_mut(&t)
            .ok_or(KleeneError::TransitionNotFound(t))?;
        tr.weight = weight;
        Ok(())
    }

    fn all_in(&self, state: StateId) -> Vec<TransitionId> {
        self.states
            .get(&state)
            .map(|data| data.ins.iter().copied().collect())
            .unwrap_or_default()
    }

    fn all_out(&self, state: StateId) -> Vec<TransitionId> {
        self.states
            .get(&state)
            .map(|data| data.outs.iter().copied().collect())
            .unwrap_or_default()
    }
}

// =============================================================================
// SERIALIZATION SUPPORT
// =============================================================================

/// Serializable snapshot of an automaton.
///
/// Transitions (initial and final arrows included) are sorted by
/// `(src, label, dst)`, so two automata with the same states and weighted
/// transitions produce equal snapshots regardless of insertion history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableAutomaton<V> {
    pub states: Vec<StateId>,
    pub transitions: Vec<Transition<V>>,
    pub next_state: u64,
}

impl<W: WeightSet> From<&MutableAutomaton<W>> for SerializableAutomaton<W::Value> {
    fn from(aut: &MutableAutomaton<W>) -> Self {
        let mut transitions: Vec<Transition<W::Value>> =
            aut.transitions.values().cloned().collect();
        transitions.sort_by_key(|tr| (tr.src, tr.label, tr.dst));
        Self {
            states: aut.states(),
            transitions,
            next_state: aut.next_state,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
