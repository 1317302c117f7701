//! # Structural Transforms
//!
//! Copy-based transformations of automata:
//! - `Copier`: filtered copy recording where each state went
//! - `copy`, `abs_copy`: whole copies (the latter replacing weights by
//!   their absolute value)
//! - `transpose`: reverse every transition, swapping initial and final
//! - `accessible`: keep only states reachable from an initial state
//!
//! Output automata are fresh `MutableAutomaton`s; copied states are
//! renumbered in ascending order of their input ids.

use crate::automaton::{AutomatonStore, MutableAutomaton};
use crate::primitives::{POST_STATE, PRE_STATE};
use crate::weightset::WeightSet;
use crate::{KleeneError, StateId, Transition, TransitionId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

type ValueOf<A> = <<A as AutomatonStore>::Weights as WeightSet>::Value;

// =============================================================================
// COPIER
// =============================================================================

/// Copies a filtered part of an automaton into another one.
///
/// After `copy_into`, `state_map` maps every copied input state to its
/// counterpart in the output.
pub struct Copier<'a, A: AutomatonStore> {
    input: &'a A,
    state_map: BTreeMap<StateId, StateId>,
}

impl<'a, A: AutomatonStore> Copier<'a, A> {
    #[must_use]
    pub fn new(input: &'a A) -> Self {
        Self {
            input,
            state_map: BTreeMap::new(),
        }
    }

    /// Copy the states accepted by `keep_state` and, among the transitions
    /// joining two copied states, those accepted by `keep_transition`.
    pub fn copy_into<S, T>(
        &mut self,
        out: &mut MutableAutomaton<A::Weights>,
        keep_state: S,
        keep_transition: T,
    ) -> Result<(), KleeneError>
    where
        S: Fn(StateId) -> bool,
        T: Fn(&Transition<ValueOf<A>>) -> bool,
    {
        self.copy_into_with(out, keep_state, keep_transition, <ValueOf<A> as Clone>::clone)
    }

    /// Like `copy_into`, mapping each copied weight through `map_weight`.
    pub fn copy_into_with<S, T, M>(
        &mut self,
        out: &mut MutableAutomaton<A::Weights>,
        keep_state: S,
        keep_transition: T,
        map_weight: M,
    ) -> Result<(), KleeneError>
    where
        S: Fn(StateId) -> bool,
        T: Fn(&Transition<ValueOf<A>>) -> bool,
        M: Fn(&ValueOf<A>) -> ValueOf<A>,
    {
        self.state_map.insert(PRE_STATE, PRE_STATE);
        self.state_map.insert(POST_STATE, POST_STATE);
        for state in self.input.states() {
            if keep_state(state) {
                let copied = out.new_state();
                self.state_map.insert(state, copied);
            }
        }

        for t in all_transition_ids(self.input) {
            let Some(tr) = self.input.transition(t) else {
                continue;
            };
            let (Some(&src), Some(&dst)) = (self.state_map.get(&tr.src), self.state_map.get(&tr.dst))
            else {
                continue;
            };
            if keep_transition(tr) {
                out.add_transition(src, dst, tr.label, map_weight(&tr.weight))?;
            }
        }
        Ok(())
    }

    /// Input state -> output state, for every copied state.
    #[must_use]
    pub fn state_map(&self) -> &BTreeMap<StateId, StateId> {
        &self.state_map
    }
}

/// Every transition of `aut`, initial and final arrows included, grouped by
/// source state.
fn all_transition_ids<A: AutomatonStore>(aut: &A) -> Vec<TransitionId> {
    std::iter::once(PRE_STATE)
        .chain(aut.states())
        .flat_map(|s| aut.all_out(s))
        .collect()
}

// =============================================================================
// WHOLE-AUTOMATON TRANSFORMS
// =============================================================================

/// A full copy of `aut`.
pub fn copy<A: AutomatonStore>(aut: &A) -> Result<MutableAutomaton<A::Weights>, KleeneError> {
    let mut out = MutableAutomaton::new(aut.weightset().clone());
    Copier::new(aut).copy_into(&mut out, |_| true, |_| true)?;
    Ok(out)
}

/// A copy of `aut` where every weight is replaced by its absolute value.
pub fn abs_copy<A: AutomatonStore>(aut: &A) -> Result<MutableAutomaton<A::Weights>, KleeneError> {
    let ws = aut.weightset().clone();
    let mut out = MutableAutomaton::new(ws.clone());
    Copier::new(aut).copy_into_with(&mut out, |_| true, |_| true, |w| ws.abs(w))?;
    Ok(out)
}

/// The transposed automaton: every transition reversed, initial and final
/// weights exchanged, weights transposed.
pub fn transpose<A: AutomatonStore>(aut: &A) -> Result<MutableAutomaton<A::Weights>, KleeneError> {
    let ws = aut.weightset().clone();
    let mut out = MutableAutomaton::new(ws.clone());

    let mut state_map = BTreeMap::new();
    state_map.insert(PRE_STATE, POST_STATE);
    state_map.insert(POST_STATE, PRE_STATE);
    for state in aut.states() {
        state_map.insert(state, out.new_state());
    }

    for t in all_transition_ids(aut) {
        let Some(tr) = aut.transition(t) else {
            continue;
        };
        if let (Some(&src), Some(&dst)) = (state_map.get(&tr.src), state_map.get(&tr.dst)) {
            out.add_transition(dst, src, tr.label, ws.transpose(&tr.weight))?;
        }
    }
    Ok(out)
}

/// States reachable from an initial state.
pub fn accessible_states<A: AutomatonStore>(aut: &A) -> BTreeSet<StateId> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<StateId> = aut
        .initial_transitions()
        .into_iter()
        .filter_map(|t| aut.dst_of(t))
        .collect();

    while let Some(state) = queue.pop_front() {
        if !seen.insert(state) {
            continue;
        }
        for t in aut.out_transitions(state) {
            match aut.dst_of(t) {
                Some(dst) if !seen.contains(&dst) => queue.push_back(dst),
                _ => {}
            }
        }
    }
    seen
}

/// The accessible part of `aut`.
pub fn accessible<A: AutomatonStore>(aut: &A) -> Result<MutableAutomaton<A::Weights>, KleeneError> {
    let keep = accessible_states(aut);
    let mut out = MutableAutomaton::new(aut.weightset().clone());
    Copier::new(aut).copy_into(&mut out, |s| keep.contains(&s), |_| true)?;
    Ok(out)
}

/// Whether every state is reachable from an initial state.
pub fn is_accessible<A: AutomatonStore>(aut: &A) -> bool {
    accessible_states(aut).len() == aut.num_states()
}

// =============================================================================
// TESTS
// =============================================================================
