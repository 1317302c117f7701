//! # Property-Based Tests
//!
//! Language preservation, properness and determinism of epsilon-removal on
//! random automata.

use kleene_core::{
    AutomatonStore, B, Label, MutableAutomaton, ProperAlgorithm, ProperConfig, Q, Rational,
    SerializableAutomaton, StateId, Z, ZMin, ZMinValue, copy, evaluate, is_eps_acyclic,
    is_proper, is_valid, remove_epsilons, remove_epsilons_with_config,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// GENERATORS
// =============================================================================

/// Shape of a random automaton, independent of its weightset.
#[derive(Debug, Clone)]
struct Shape {
    states: usize,
    initial: Vec<usize>,
    finals: Vec<usize>,
    /// `(src, dst, label code, weight)`
    edges: Vec<(usize, usize, u8, i64)>,
}

fn shape(max_states: usize, max_edges: usize) -> impl Strategy<Value = Shape> {
    (1usize..=max_states)
        .prop_flat_map(move |n| {
            (
                Just(n),
                vec(0..n, 1..=2),
                vec(0..n, 1..=2),
                vec((0..n, 0..n, 0u8..3, -3i64..=3), 0..=max_edges),
            )
        })
        .prop_map(|(states, initial, finals, edges)| Shape {
            states,
            initial,
            finals,
            edges,
        })
}

fn label(code: u8) -> Label {
    match code % 3 {
        0 => Label::One,
        1 => Label::Letter('a'),
        _ => Label::Letter('b'),
    }
}

fn nonzero(w: i64) -> i64 {
    if w == 0 { 1 } else { w }
}

fn build_b(shape: &Shape) -> MutableAutomaton<B> {
    let mut aut = MutableAutomaton::new(B);
    let states = aut.new_states(shape.states);
    for &i in &shape.initial {
        aut.set_initial(states[i], true).expect("initial");
    }
    for &f in &shape.finals {
        aut.set_final(states[f], true).expect("final");
    }
    for &(src, dst, code, _) in &shape.edges {
        aut.add_transition(states[src], states[dst], label(code), true)
            .expect("add");
    }
    aut
}

fn build_b_proper(shape: &Shape) -> MutableAutomaton<B> {
    let mut proper = shape.clone();
    for edge in &mut proper.edges {
        edge.2 = 1 + edge.2 % 2;
    }
    build_b(&proper)
}

/// Spontaneous transitions only go from lower to higher states.
fn build_z_acyclic(shape: &Shape) -> MutableAutomaton<Z> {
    let mut aut = MutableAutomaton::new(Z);
    let states = aut.new_states(shape.states);
    for &i in &shape.initial {
        aut.set_initial(states[i], 1).expect("initial");
    }
    for &f in &shape.finals {
        aut.set_final(states[f], 2).expect("final");
    }
    for &(src, dst, code, w) in &shape.edges {
        let lbl = label(code);
        if lbl.is_one() && src >= dst {
            continue;
        }
        aut.add_transition(states[src], states[dst], lbl, nonzero(w))
            .expect("add");
    }
    aut
}

fn build_z(shape: &Shape) -> MutableAutomaton<Z> {
    let mut aut = MutableAutomaton::new(Z);
    let states = aut.new_states(shape.states);
    for &i in &shape.initial {
        aut.set_initial(states[i], 1).expect("initial");
    }
    for &(src, dst, code, w) in &shape.edges {
        aut.add_transition(states[src], states[dst], label(code), nonzero(w))
            .expect("add");
    }
    aut
}

fn build_zmin(shape: &Shape) -> MutableAutomaton<ZMin> {
    let mut aut = MutableAutomaton::new(ZMin);
    let states = aut.new_states(shape.states);
    for &i in &shape.initial {
        aut.set_initial(states[i], ZMinValue::Finite(0))
            .expect("initial");
    }
    for &(src, dst, code, w) in &shape.edges {
        aut.add_transition(states[src], states[dst], label(code), ZMinValue::Finite(w))
            .expect("add");
    }
    aut
}

/// Positive weights below one, so that absolute values change nothing.
fn build_q(shape: &Shape) -> MutableAutomaton<Q> {
    let mut aut = MutableAutomaton::new(Q);
    let states = aut.new_states(shape.states);
    for &i in &shape.initial {
        aut.set_initial(states[i], Rational::integer(1))
            .expect("initial");
    }
    for &(src, dst, code, w) in &shape.edges {
        let weight = Rational::new(1, 2 + w.abs());
        aut.add_transition(states[src], states[dst], label(code), weight)
            .expect("add");
    }
    aut
}

// =============================================================================
// REFERENCE SEMANTICS
// =============================================================================

fn words() -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..3 {
        let mut next = Vec::new();
        for w in &frontier {
            for c in ['a', 'b'] {
                next.push(format!("{w}{c}"));
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

fn eps_closure(aut: &MutableAutomaton<B>, mut set: BTreeSet<StateId>) -> BTreeSet<StateId> {
    let mut stack: Vec<StateId> = set.iter().copied().collect();
    while let Some(s) = stack.pop() {
        for t in aut.out_with(s, Label::One) {
            let dst = aut.dst_of(t).expect("dst");
            if set.insert(dst) {
                stack.push(dst);
            }
        }
    }
    set
}

/// Acceptance through spontaneous transitions, without removing them.
fn accepts(aut: &MutableAutomaton<B>, word: &str) -> bool {
    let initial = aut
        .initial_transitions()
        .into_iter()
        .filter_map(|t| aut.dst_of(t))
        .collect();
    let mut current = eps_closure(aut, initial);
    for c in word.chars() {
        let next = current
            .iter()
            .flat_map(|s| aut.out_with(*s, Label::Letter(c)))
            .filter_map(|t| aut.dst_of(t))
            .collect();
        current = eps_closure(aut, next);
    }
    current.iter().any(|s| aut.is_final(*s))
}

/// Weighted closure; states are visited in ascending order, which is a
/// topological order of the spontaneous transitions.
fn z_close(aut: &MutableAutomaton<Z>, weights: &mut BTreeMap<StateId, i64>) {
    for s in aut.states() {
        let Some(&w) = weights.get(&s) else {
            continue;
        };
        for t in aut.out_with(s, Label::One) {
            let dst = aut.dst_of(t).expect("dst");
            let k = aut.weight_of(t).expect("weight");
            *weights.entry(dst).or_insert(0) += w * k;
        }
    }
}

fn z_weight(aut: &MutableAutomaton<Z>, word: &str) -> i64 {
    let mut current = BTreeMap::new();
    for t in aut.initial_transitions() {
        let dst = aut.dst_of(t).expect("dst");
        *current.entry(dst).or_insert(0) += aut.weight_of(t).expect("weight");
    }
    z_close(aut, &mut current);
    for c in word.chars() {
        let mut next = BTreeMap::new();
        for (s, w) in &current {
            for t in aut.out_with(*s, Label::Letter(c)) {
                let dst = aut.dst_of(t).expect("dst");
                *next.entry(dst).or_insert(0) += w * aut.weight_of(t).expect("weight");
            }
        }
        z_close(aut, &mut next);
        current = next;
    }
    current
        .iter()
        .map(|(s, w)| w * aut.final_weight(*s))
        .sum()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Boolean automata accept the same words before and after removal.
    #[test]
    fn boolean_language_is_preserved(shape in shape(6, 14)) {
        let aut = build_b(&shape);
        let res = remove_epsilons(&aut).expect("starable weightset never fails");
        for word in words() {
            prop_assert_eq!(
                evaluate(&res, &word).expect("eval"),
                accepts(&aut, &word),
                "word {:?}", word
            );
        }
    }

    /// Integer weights are preserved on epsilon-acyclic automata.
    #[test]
    fn integer_weights_are_preserved(shape in shape(6, 14)) {
        let aut = build_z_acyclic(&shape);
        prop_assert!(is_eps_acyclic(&aut));
        let res = remove_epsilons(&aut).expect("acyclic input is valid");
        for word in words() {
            prop_assert_eq!(
                evaluate(&res, &word).expect("eval"),
                z_weight(&aut, &word),
                "word {:?}", word
            );
        }
    }

    /// The result of a successful removal is proper.
    #[test]
    fn result_is_proper(shape in shape(6, 14)) {
        let res = remove_epsilons(&build_b(&shape)).expect("proper");
        prop_assert!(is_proper(&res));

        if let Ok(res) = remove_epsilons(&build_z(&shape)) {
            prop_assert!(is_proper(&res));
        }
    }

    /// Proper input comes back unchanged.
    #[test]
    fn proper_input_is_a_fixed_point(shape in shape(6, 14)) {
        let aut = build_b_proper(&shape);
        prop_assert!(is_proper(&aut));
        let res = remove_epsilons(&aut).expect("proper");
        prop_assert_eq!(
            SerializableAutomaton::from(&res),
            SerializableAutomaton::from(&copy(&aut).expect("copy"))
        );
    }

    /// Equal inputs give equal outputs.
    #[test]
    fn removal_is_deterministic(shape in shape(6, 14)) {
        let first = remove_epsilons(&build_b(&shape)).expect("proper");
        let second = remove_epsilons(&build_b(&shape)).expect("proper");
        prop_assert_eq!(
            SerializableAutomaton::from(&first),
            SerializableAutomaton::from(&second)
        );
    }

    /// `is_valid` predicts whether removal succeeds, for each star status.
    #[test]
    fn validity_agrees_with_removal(shape in shape(5, 10)) {
        let b = build_b(&shape);
        prop_assert_eq!(is_valid(&b), remove_epsilons(&b).is_ok());

        let z = build_z(&shape);
        prop_assert_eq!(is_valid(&z), remove_epsilons(&z).is_ok());

        let zmin = build_zmin(&shape);
        prop_assert_eq!(is_valid(&zmin), remove_epsilons(&zmin).is_ok());

        let q = build_q(&shape);
        prop_assert_eq!(is_valid(&q), remove_epsilons(&q).is_ok());
    }

    /// Both engines accept the same language.
    #[test]
    fn engines_agree(shape in shape(6, 14)) {
        let aut = build_b(&shape);
        let separate = remove_epsilons(&aut).expect("separate");
        let in_place = remove_epsilons_with_config(
            &aut,
            ProperConfig::default().with_algorithm(ProperAlgorithm::InPlace),
        )
        .expect("in place");
        for word in words() {
            prop_assert_eq!(
                evaluate(&separate, &word).expect("eval"),
                evaluate(&in_place, &word).expect("eval")
            );
        }
    }
}
