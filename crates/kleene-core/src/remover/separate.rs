//! Elimination across the spontaneous and proper graphs of a [`Split`].

use super::{EliminationStats, take_closure, trace_queue};
use crate::automaton::{AutomatonStore, MutableAutomaton};
use crate::config::ProperConfig;
use crate::primitives::DEBUG_STEPS;
use crate::profile::{EliminationQueue, EpsilonProfile};
use crate::split::{Split, StateMap, split};
use crate::weightset::WeightSet;
use crate::{KleeneError, StateId};
use std::collections::BTreeSet;
use tracing::debug;

/// Removes spontaneous transitions by eliminating states of the
/// spontaneous graph into the proper graph.
///
/// States are identified by their proper-graph id throughout; the
/// spontaneous twin is found through the state maps.
#[derive(Debug)]
pub struct EpsilonRemover<W: WeightSet> {
    config: ProperConfig,
    spontaneous: MutableAutomaton<W>,
    proper: MutableAutomaton<W>,
    proper_to_spontaneous: StateMap,
    spontaneous_to_proper: StateMap,
    queue: EliminationQueue,
    stats: EliminationStats,
}

impl<W: WeightSet> EpsilonRemover<W> {
    /// Split `aut` and queue every state with an incoming spontaneous
    /// transition.
    pub fn new<A>(aut: &A, config: ProperConfig) -> Result<Self, KleeneError>
    where
        A: AutomatonStore<Weights = W>,
    {
        let Split {
            spontaneous,
            proper,
            proper_to_spontaneous,
            spontaneous_to_proper,
        } = split(aut)?;

        let mut remover = Self {
            config,
            spontaneous,
            proper,
            proper_to_spontaneous,
            spontaneous_to_proper,
            queue: EliminationQueue::new(),
            stats: EliminationStats::default(),
        };
        remover.build_queue()?;
        Ok(remover)
    }

    fn build_queue(&mut self) -> Result<(), KleeneError> {
        for dirty in self.spontaneous.states() {
            if self.spontaneous.in_transitions(dirty).is_empty() {
                continue;
            }
            let proper = self
                .spontaneous_to_proper
                .get(dirty)
                .ok_or(KleeneError::StateNotFound(dirty))?;
            self.queue.insert(self.profile_of(proper));
        }
        if self.config.debug_level >= DEBUG_STEPS {
            debug!(queued = self.queue.len(), "elimination queue built");
        }
        Ok(())
    }

    /// Current degrees of `proper_s` across both graphs.
    fn profile_of(&self, proper_s: StateId) -> EpsilonProfile {
        let (in_dirty, out_dirty) = match self.proper_to_spontaneous.get(proper_s) {
            Some(dirty) => (
                self.spontaneous.in_transitions(dirty).len(),
                self.spontaneous.out_transitions(dirty).len(),
            ),
            None => (0, 0),
        };
        let in_proper = self.proper.in_transitions(proper_s).len();
        let out_proper = self.proper.all_out(proper_s).len();
        EpsilonProfile::new(
            proper_s,
            in_dirty,
            in_proper.saturating_add(in_dirty),
            out_dirty,
            out_proper.saturating_add(out_dirty),
        )
    }

    /// Eliminate the incoming spontaneous transitions of one state.
    ///
    /// `proper_s` and `dirty_s` must be twins. Independent of the queue, so
    /// a single state can be eliminated on demand.
    pub fn eliminate(&mut self, proper_s: StateId, dirty_s: StateId) -> Result<(), KleeneError> {
        let incoming = self.spontaneous.in_transitions(dirty_s);
        let closure = take_closure(&mut self.spontaneous, dirty_s, incoming)?;
        let ws = self.proper.weightset().clone();

        for t in self.spontaneous.out_transitions(dirty_s) {
            let Some(tr) = self.spontaneous.transition(t).cloned() else {
                continue;
            };
            let blow = ws.mul(&closure.star, &tr.weight);
            self.spontaneous.set_weight(t, blow.clone())?;
            for (src, w) in &closure.sources {
                self.spontaneous
                    .add_transition(*src, tr.dst, tr.label, ws.mul(w, &blow))?;
            }
        }

        for t in self.proper.all_out(proper_s) {
            let Some(tr) = self.proper.transition(t).cloned() else {
                continue;
            };
            let blow = ws.mul(&closure.star, &tr.weight);
            self.proper.set_weight(t, blow.clone())?;
            for (src, w) in &closure.sources {
                let src = self
                    .spontaneous_to_proper
                    .get(*src)
                    .ok_or(KleeneError::StateNotFound(*src))?;
                self.proper
                    .add_transition(src, tr.dst, tr.label, ws.mul(w, &blow))?;
            }
        }

        let outs = self
            .proper
            .all_out(proper_s)
            .len()
            .saturating_add(self.spontaneous.out_transitions(dirty_s).len());
        let added = outs.saturating_mul(closure.sources.len());
        let mut removed = closure.removed;

        let prune = self.config.prune
            && self.spontaneous.in_transitions(dirty_s).is_empty()
            && self.proper.all_in(proper_s).is_empty();
        if prune {
            removed = removed.saturating_add(outs);
            self.proper.del_state(proper_s)?;
            self.spontaneous.del_state(dirty_s)?;
            self.proper_to_spontaneous.clear(proper_s);
            self.spontaneous_to_proper.clear(dirty_s);
        }

        self.stats.record(removed, added, prune);
        if self.config.debug_level >= DEBUG_STEPS {
            debug!(
                state = %proper_s,
                removed,
                added,
                pruned = prune,
                spontaneous = self.spontaneous.num_transitions(),
                total = self
                    .spontaneous
                    .num_transitions()
                    .saturating_add(self.proper.num_transitions()),
                "eliminated"
            );
        }
        Ok(())
    }

    /// Pop and eliminate the state of highest priority.
    ///
    /// Returns the profile it had when popped, or `None` once the queue is
    /// exhausted.
    pub fn step(&mut self) -> Result<Option<EpsilonProfile>, KleeneError> {
        trace_queue(self.config.debug_level, "before", &self.queue);
        let Some(profile) = self.queue.pop() else {
            return Ok(None);
        };
        if self.config.debug_level >= DEBUG_STEPS {
            debug!(%profile, bound = profile.added_bound(), "remove");
        }

        let proper_s = profile.state;
        let mut neighbors = BTreeSet::new();
        for t in self.proper.in_transitions(proper_s) {
            neighbors.extend(self.proper.src_of(t));
        }
        for t in self.proper.out_transitions(proper_s) {
            neighbors.extend(self.proper.dst_of(t));
        }

        if let Some(dirty_s) = self.proper_to_spontaneous.get(proper_s) {
            for t in self.spontaneous.in_transitions(dirty_s) {
                let src = self.spontaneous.src_of(t);
                neighbors.extend(src.and_then(|s| self.spontaneous_to_proper.get(s)));
            }
            for t in self.spontaneous.out_transitions(dirty_s) {
                let dst = self.spontaneous.dst_of(t);
                neighbors.extend(dst.and_then(|s| self.spontaneous_to_proper.get(s)));
            }
            self.eliminate(proper_s, dirty_s)?;
        }

        neighbors.remove(&proper_s);
        for n in neighbors {
            if self.queue.contains(n) {
                let updated = self.profile_of(n);
                self.queue.update(updated);
            }
        }
        trace_queue(self.config.debug_level, "after", &self.queue);
        Ok(Some(profile))
    }

    /// Eliminate until the queue is empty, returning the proper graph.
    pub fn run(mut self) -> Result<(MutableAutomaton<W>, EliminationStats), KleeneError> {
        while self.step()?.is_some() {}
        if self.config.debug_level >= DEBUG_STEPS {
            debug!(stats = %self.stats, "elimination done");
        }
        Ok((self.proper, self.stats))
    }

    #[must_use]
    pub fn queue(&self) -> &EliminationQueue {
        &self.queue
    }

    #[must_use]
    pub fn spontaneous(&self) -> &MutableAutomaton<W> {
        &self.spontaneous
    }

    #[must_use]
    pub fn proper(&self) -> &MutableAutomaton<W> {
        &self.proper
    }

    /// Proper-graph twin of a spontaneous-graph state.
    #[must_use]
    pub fn proper_state(&self, dirty_s: StateId) -> Option<StateId> {
        self.spontaneous_to_proper.get(dirty_s)
    }

    /// Spontaneous-graph twin of a proper-graph state.
    #[must_use]
    pub fn spontaneous_state(&self, proper_s: StateId) -> Option<StateId> {
        self.proper_to_spontaneous.get(proper_s)
    }

    #[must_use]
    pub fn stats(&self) -> EliminationStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;
    use crate::weightset::{B, Z, ZMin, ZMinValue};

    #[test]
    fn closure_propagates_letters_and_final_weight() {
        let mut aut = MutableAutomaton::new(Z);
        let [s0, s1] = [aut.new_state(), aut.new_state()];
        aut.add_transition(s0, s1, Label::One, 2).expect("add");
        aut.add_transition(s1, s1, Label::Letter('a'), 3)
            .expect("add");
        aut.set_final(s1, 1).expect("final");

        let remover = EpsilonRemover::new(&aut, ProperConfig::default()).expect("new");
        assert_eq!(remover.queue().len(), 1);
        let (res, stats) = remover.run().expect("run");

        assert_eq!(res.num_states(), 2);
        let [r0, r1] = [res.states()[0], res.states()[1]];
        let t = res
            .get_transition(r0, r1, Label::Letter('a'))
            .expect("propagated letter");
        assert_eq!(res.weight_of(t), Some(6));
        assert_eq!(res.final_weight(r0), 2);
        assert_eq!(res.final_weight(r1), 1);
        let lp = res
            .get_transition(r1, r1, Label::Letter('a'))
            .expect("loop kept");
        assert_eq!(res.weight_of(lp), Some(3));
        assert_eq!(stats.eliminated, 1);
        assert_eq!(stats.pruned, 0);
    }

    #[test]
    fn lone_self_loop_is_removed_without_new_edges() {
        let mut aut = MutableAutomaton::new(ZMin);
        let s = aut.new_state();
        aut.set_initial(s, ZMinValue::Finite(0)).expect("initial");
        aut.add_transition(s, s, Label::One, ZMinValue::Finite(2))
            .expect("add");

        let (res, stats) = EpsilonRemover::new(&aut, ProperConfig::default())
            .expect("new")
            .run()
            .expect("run");
        assert_eq!(res.num_states(), 1);
        assert_eq!(res.num_transitions(), 0);
        assert_eq!(stats.added, 0);
    }

    #[test]
    fn unreachable_eliminated_state_is_pruned() {
        let mut aut = MutableAutomaton::new(B);
        let s = aut.new_state();
        aut.add_transition(s, s, Label::One, true).expect("add");

        let pruned = EpsilonRemover::new(&aut, ProperConfig::default())
            .expect("new")
            .run()
            .expect("run");
        assert_eq!(pruned.0.num_states(), 0);
        assert_eq!(pruned.1.pruned, 1);

        let kept = EpsilonRemover::new(&aut, ProperConfig::default().with_prune(false))
            .expect("new")
            .run()
            .expect("run");
        assert_eq!(kept.0.num_states(), 1);
        assert_eq!(kept.1.pruned, 0);
    }

    #[test]
    fn chain_is_eliminated_from_the_end() {
        // i -e-> p -e-> q -a-> f
        let mut aut = MutableAutomaton::new(B);
        let [i, p, q, f] = [
            aut.new_state(),
            aut.new_state(),
            aut.new_state(),
            aut.new_state(),
        ];
        aut.set_initial(i, true).expect("initial");
        aut.add_transition(i, p, Label::One, true).expect("add");
        aut.add_transition(p, q, Label::One, true).expect("add");
        aut.add_transition(q, f, Label::Letter('a'), true)
            .expect("add");
        aut.set_final(f, true).expect("final");

        let mut remover = EpsilonRemover::new(&aut, ProperConfig::default()).expect("new");
        let first = remover.step().expect("step").expect("queued");
        assert_eq!(first.out_sp, 0);
        let second = remover.step().expect("step").expect("queued");
        assert_ne!(first.state, second.state);
        assert_eq!(remover.step().expect("step"), None);

        let res = remover.proper();
        assert_eq!(res.num_states(), 2);
        let [ri, rf] = [res.states()[0], res.states()[1]];
        assert!(res.get_transition(ri, rf, Label::Letter('a')).is_some());
        assert!(res.is_initial(ri));
        assert!(res.is_final(rf));
    }

    #[test]
    fn star_failure_propagates() {
        let mut aut = MutableAutomaton::new(Z);
        let s = aut.new_state();
        aut.add_transition(s, s, Label::One, -1).expect("add");

        let err = EpsilonRemover::new(&aut, ProperConfig::default())
            .expect("new")
            .run()
            .err();
        assert!(err.is_some_and(|e| e.is_not_starable()));
    }
}
