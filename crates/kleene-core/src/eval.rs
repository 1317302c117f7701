//! # Evaluation
//!
//! Weight of a word on a proper automaton: the sum, over every accepting
//! path labeled by the word, of the product of initial, transition and final
//! weights along the path.

use crate::automaton::AutomatonStore;
use crate::proper::is_proper;
use crate::weightset::WeightSet;
use crate::{KleeneError, Label, StateId};
use std::collections::BTreeMap;

type ValueOf<A> = <<A as AutomatonStore>::Weights as WeightSet>::Value;

/// Weight of `word` in `aut`.
///
/// Fails with `InvalidAutomaton` when `aut` has spontaneous transitions.
pub fn evaluate<A: AutomatonStore>(aut: &A, word: &str) -> Result<ValueOf<A>, KleeneError> {
    if !is_proper(aut) {
        return Err(KleeneError::InvalidAutomaton(
            "evaluate: automaton has spontaneous transitions".to_string(),
        ));
    }
    let ws = aut.weightset();

    let mut current: BTreeMap<StateId, ValueOf<A>> = BTreeMap::new();
    for t in aut.initial_transitions() {
        if let Some(tr) = aut.transition(t) {
            accumulate(ws, &mut current, tr.dst, &tr.weight);
        }
    }

    for letter in word.chars() {
        let mut next = BTreeMap::new();
        for (state, weight) in &current {
            for t in aut.out_with(*state, Label::Letter(letter)) {
                if let Some(tr) = aut.transition(t) {
                    accumulate(ws, &mut next, tr.dst, &ws.mul(weight, &tr.weight));
                }
            }
        }
        current = next;
        if current.is_empty() {
            break;
        }
    }

    Ok(current.iter().fold(ws.zero(), |acc, (state, weight)| {
        ws.add(&acc, &ws.mul(weight, &aut.final_weight(*state)))
    }))
}

fn accumulate<W: WeightSet>(
    ws: &W,
    weights: &mut BTreeMap<StateId, W::Value>,
    state: StateId,
    weight: &W::Value,
) {
    let sum = match weights.get(&state) {
        Some(current) => ws.add(current, weight),
        None => weight.clone(),
    };
    if ws.is_zero(&sum) {
        weights.remove(&state);
    } else {
        weights.insert(state, sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::MutableAutomaton;
    use crate::weightset::{B, Z};

    /// Counts the `a`s of words over `{a, b}`.
    fn count_a() -> MutableAutomaton<Z> {
        let mut aut = MutableAutomaton::new(Z);
        let [p, q] = [aut.new_state(), aut.new_state()];
        aut.set_initial(p, 1).expect("initial");
        aut.set_final(q, 1).expect("final");
        for s in [p, q] {
            aut.add_transition(s, s, Label::Letter('a'), 1)
                .expect("add");
            aut.add_transition(s, s, Label::Letter('b'), 1)
                .expect("add");
        }
        aut.add_transition(p, q, Label::Letter('a'), 1)
            .expect("add");
        aut
    }

    #[test]
    fn sums_over_accepting_paths() {
        let aut = count_a();
        assert_eq!(evaluate(&aut, "").expect("eval"), 0);
        assert_eq!(evaluate(&aut, "b").expect("eval"), 0);
        assert_eq!(evaluate(&aut, "aba").expect("eval"), 2);
        assert_eq!(evaluate(&aut, "aaa").expect("eval"), 3);
        assert_eq!(evaluate(&aut, "abc").expect("eval"), 0);
    }

    #[test]
    fn empty_word_uses_initial_and_final_weights() {
        let mut aut = MutableAutomaton::new(B);
        let p = aut.new_state();
        aut.set_initial(p, true).expect("initial");
        aut.set_final(p, true).expect("final");
        assert!(evaluate(&aut, "").expect("eval"));
        assert!(!evaluate(&aut, "a").expect("eval"));
    }

    #[test]
    fn rejects_spontaneous_transitions() {
        let mut aut = MutableAutomaton::new(B);
        let [p, q] = [aut.new_state(), aut.new_state()];
        aut.add_transition(p, q, Label::One, true).expect("add");
        assert!(matches!(
            evaluate(&aut, "a"),
            Err(KleeneError::InvalidAutomaton(_))
        ));
    }
}
