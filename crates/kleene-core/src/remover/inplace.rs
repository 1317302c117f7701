//! Elimination inside a single automaton.
//!
//! Same profiles, queue and elimination steps as [`super::EpsilonRemover`],
//! with spontaneous transitions selected by label instead of living in a
//! graph of their own. Surviving states and transitions keep their ids.

use super::{EliminationStats, take_closure, trace_queue};
use crate::automaton::AutomatonStore;
use crate::config::ProperConfig;
use crate::primitives::DEBUG_STEPS;
use crate::profile::{EliminationQueue, EpsilonProfile};
use crate::weightset::WeightSet;
use crate::{KleeneError, Label, StateId};
use std::collections::BTreeSet;
use tracing::debug;

/// Removes the spontaneous transitions of a borrowed automaton.
///
/// On failure the automaton is left partially rewritten; callers that need
/// it intact must run on a copy.
pub struct InPlaceRemover<'a, A: AutomatonStore> {
    aut: &'a mut A,
    config: ProperConfig,
    queue: EliminationQueue,
    stats: EliminationStats,
}

impl<'a, A: AutomatonStore> InPlaceRemover<'a, A> {
    #[must_use]
    pub fn new(aut: &'a mut A, config: ProperConfig) -> Self {
        let mut remover = Self {
            aut,
            config,
            queue: EliminationQueue::new(),
            stats: EliminationStats::default(),
        };
        for s in remover.aut.states() {
            if !remover.aut.in_with(s, Label::One).is_empty() {
                let profile = remover.profile_of(s);
                remover.queue.insert(profile);
            }
        }
        remover
    }

    fn profile_of(&self, s: StateId) -> EpsilonProfile {
        EpsilonProfile::new(
            s,
            self.aut.in_with(s, Label::One).len(),
            self.aut.in_transitions(s).len(),
            self.aut.out_with(s, Label::One).len(),
            self.aut.all_out(s).len(),
        )
    }

    /// Eliminate the incoming spontaneous transitions of `s`.
    pub fn eliminate(&mut self, s: StateId) -> Result<(), KleeneError> {
        let incoming = self.aut.in_with(s, Label::One);
        let closure = take_closure(&mut *self.aut, s, incoming)?;
        let ws = self.aut.weightset().clone();

        for t in self.aut.all_out(s) {
            let Some(tr) = self.aut.transition(t).cloned() else {
                continue;
            };
            let blow = ws.mul(&closure.star, &tr.weight);
            self.aut.set_weight(t, blow.clone())?;
            for (src, w) in &closure.sources {
                self.aut
                    .add_transition(*src, tr.dst, tr.label, ws.mul(w, &blow))?;
            }
        }

        let outs = self.aut.all_out(s).len();
        let added = outs.saturating_mul(closure.sources.len());
        let mut removed = closure.removed;
        let prune = self.config.prune && self.aut.all_in(s).is_empty();
        if prune {
            removed = removed.saturating_add(outs);
            self.aut.del_state(s)?;
        }

        self.stats.record(removed, added, prune);
        if self.config.debug_level >= DEBUG_STEPS {
            debug!(
                state = %s,
                removed,
                added,
                pruned = prune,
                total = self.aut.num_transitions(),
                "eliminated in place"
            );
        }
        Ok(())
    }

    /// Pop and eliminate the state of highest priority.
    pub fn step(&mut self) -> Result<Option<EpsilonProfile>, KleeneError> {
        trace_queue(self.config.debug_level, "before", &self.queue);
        let Some(profile) = self.queue.pop() else {
            return Ok(None);
        };
        if self.config.debug_level >= DEBUG_STEPS {
            debug!(%profile, bound = profile.added_bound(), "remove");
        }

        let s = profile.state;
        let mut neighbors = BTreeSet::new();
        for t in self.aut.in_transitions(s) {
            neighbors.extend(self.aut.src_of(t));
        }
        for t in self.aut.out_transitions(s) {
            neighbors.extend(self.aut.dst_of(t));
        }
        neighbors.remove(&s);

        self.eliminate(s)?;

        for n in neighbors {
            if self.queue.contains(n) {
                let updated = self.profile_of(n);
                self.queue.update(updated);
            }
        }
        trace_queue(self.config.debug_level, "after", &self.queue);
        Ok(Some(profile))
    }

    /// Eliminate until no state has an incoming spontaneous transition.
    pub fn run(mut self) -> Result<EliminationStats, KleeneError> {
        while self.step()?.is_some() {}
        if self.config.debug_level >= DEBUG_STEPS {
            debug!(stats = %self.stats, "in-place elimination done");
        }
        Ok(self.stats)
    }

    #[must_use]
    pub fn queue(&self) -> &EliminationQueue {
        &self.queue
    }
}
