//! # Epsilon-Acyclicity
//!
//! Detects circuits made only of spontaneous transitions.
//!
//! Depth-first search restricted to `Label::One` edges, with three colors
//! per state (unvisited, in progress, done). Each state is explored once;
//! the search stops at the first back edge into a state still in progress.
//! The walk uses an explicit stack, so long spontaneous chains cannot
//! exhaust the call stack.

use crate::automaton::AutomatonStore;
use crate::{Label, StateId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    InProgress,
    Done,
}

/// One pending DFS frame: a state and the cursor into its successors.
struct Frame {
    state: StateId,
    successors: Vec<StateId>,
    cursor: usize,
}

impl Frame {
    fn new<A: AutomatonStore>(aut: &A, state: StateId) -> Self {
        Self {
            state,
            successors: aut
                .out_with(state, Label::One)
                .into_iter()
                .filter_map(|t| aut.dst_of(t))
                .collect(),
            cursor: 0,
        }
    }
}

/// Whether `aut` has no circuit of spontaneous transitions.
///
/// Linear in the number of states and spontaneous transitions.
pub fn is_eps_acyclic<A: AutomatonStore>(aut: &A) -> bool {
    let mut colors: BTreeMap<StateId, Color> = BTreeMap::new();

    for root in aut.states() {
        if colors.contains_key(&root) {
            continue;
        }
        colors.insert(root, Color::InProgress);
        let mut stack = vec![Frame::new(aut, root)];

        while let Some(frame) = stack.last_mut() {
            let next = frame.successors.get(frame.cursor).copied();
            frame.cursor = frame.cursor.saturating_add(1);

            match next {
                Some(succ) => match colors.get(&succ) {
                    Some(Color::InProgress) => return false,
                    Some(Color::Done) => {}
                    None => {
                        colors.insert(succ, Color::InProgress);
                        stack.push(Frame::new(aut, succ));
                    }
                },
                None => {
                    let state = frame.state;
                    stack.pop();
                    colors.insert(state, Color::Done);
                }
            }
        }
    }
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::MutableAutomaton;
    use crate::weightset::Z;

    #[test]
    fn empty_automaton_is_acyclic() {
        let aut = MutableAutomaton::new(Z);
        assert!(is_eps_acyclic(&aut));
    }

    #[test]
    fn spontaneous_self_loop_is_a_cycle() {
        let mut aut = MutableAutomaton::new(Z);
        let p = aut.new_state();
        aut.add_transition(p, p, Label::One, -1).expect("add");
        assert!(!is_eps_acyclic(&aut));
    }

    #[test]
    fn letter_cycles_are_ignored() {
        let mut aut = MutableAutomaton::new(Z);
        let [p, q] = [aut.new_state(), aut.new_state()];
        aut.add_transition(p, q, Label::One, 1).expect("add");
        aut.add_transition(q, p, Label::Letter('a'), 1)
            .expect("add");
        assert!(is_eps_acyclic(&aut));
    }

    #[test]
    fn long_spontaneous_circuit_is_detected() {
        let mut aut = MutableAutomaton::new(Z);
        let states = aut.new_states(5);
        for pair in states.windows(2) {
            aut.add_transition(pair[0], pair[1], Label::One, 1)
                .expect("add");
        }
        assert!(is_eps_acyclic(&aut));

        aut.add_transition(states[4], states[1], Label::One, 1)
            .expect("add");
        assert!(!is_eps_acyclic(&aut));
    }

    #[test]
    fn diamond_is_acyclic() {
        let mut aut = MutableAutomaton::new(Z);
        let [a, b, c, d] = [
            aut.new_state(),
            aut.new_state(),
            aut.new_state(),
            aut.new_state(),
        ];
        for (src, dst) in [(a, b), (a, c), (b, d), (c, d)] {
            aut.add_transition(src, dst, Label::One, 1).expect("add");
        }
        assert!(is_eps_acyclic(&aut));
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut aut = MutableAutomaton::new(Z);
        let states = aut.new_states(20_000);
        for pair in states.windows(2) {
            aut.add_transition(pair[0], pair[1], Label::One, 1)
                .expect("add");
        }
        assert!(is_eps_acyclic(&aut));
    }
}
