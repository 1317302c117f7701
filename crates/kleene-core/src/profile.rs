//! # Elimination Profiles
//!
//! Ordering of state elimination during epsilon-removal.
//!
//! Eliminating a state `s` with `i` incoming spontaneous transitions removes
//! those `i` transitions and may add up to `i × o` new ones, `o` being the
//! out-degree of `s`. A profile caches the four degrees that matter, and the
//! queue always yields the state whose elimination is expected to add the
//! fewest transitions:
//!
//! 1. fewest outgoing spontaneous transitions (they would be duplicated as
//!    new spontaneous transitions, feeding later eliminations),
//! 2. then fewest outgoing transitions overall,
//! 3. then fewest incoming spontaneous transitions,
//! 4. then lowest state id, so runs are reproducible.
//!
//! The queue is a binary max-heap with lazy invalidation: updating a
//! profile pushes a fresh entry stamped with a new generation, and stale
//! entries are skipped when popped.

use crate::StateId;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

// =============================================================================
// PROFILE
// =============================================================================

/// The degrees of a state relevant to its elimination cost.
///
/// Carries no weight information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpsilonProfile {
    /// The state to eliminate (numbered in the proper graph).
    pub state: StateId,
    /// Incoming spontaneous transitions.
    pub in_sp: usize,
    /// Incoming non-spontaneous transitions.
    pub in_nsp: usize,
    /// Outgoing spontaneous transitions.
    pub out_sp: usize,
    /// Outgoing non-spontaneous transitions, final arrow included.
    pub out_nsp: usize,
}

impl EpsilonProfile {
    /// Build a profile from spontaneous and total degrees.
    ///
    /// `ins >= in_sp` and `outs >= out_sp` are expected; the differences
    /// saturate at zero otherwise.
    #[must_use]
    pub fn new(state: StateId, in_sp: usize, ins: usize, out_sp: usize, outs: usize) -> Self {
        Self {
            state,
            in_sp,
            in_nsp: ins.saturating_sub(in_sp),
            out_sp,
            out_nsp: outs.saturating_sub(out_sp),
        }
    }

    /// Upper bound on the number of transitions the elimination adds.
    #[must_use]
    pub fn added_bound(&self) -> usize {
        self.in_sp
            .saturating_mul(self.out_sp.saturating_add(self.out_nsp))
    }

    fn priority_key(&self) -> (usize, usize, usize, StateId, usize) {
        (self.out_sp, self.out_nsp, self.in_sp, self.state, self.in_nsp)
    }
}

/// `a > b` iff `a` must be eliminated before `b`.
impl Ord for EpsilonProfile {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority_key().cmp(&self.priority_key())
    }
}

impl PartialOrd for EpsilonProfile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EpsilonProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}o{}O{}i{}I{}",
            self.state, self.out_sp, self.out_nsp, self.in_sp, self.in_nsp
        )
    }
}

// =============================================================================
// QUEUE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeapEntry {
    profile: EpsilonProfile,
    generation: u64,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.profile
            .cmp(&other.profile)
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-priority queue of profiles supporting priority updates.
///
/// Each queued state owns a handle (its current generation); only the heap
/// entry carrying that generation is live.
#[derive(Debug, Default)]
pub struct EliminationQueue {
    heap: BinaryHeap<HeapEntry>,
    handles: BTreeMap<StateId, (u64, EpsilonProfile)>,
    next_generation: u64,
}

impl EliminationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile, or replace the profile of an already queued state.
    pub fn insert(&mut self, profile: EpsilonProfile) {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.saturating_add(1);
        self.handles.insert(profile.state, (generation, profile));
        self.heap.push(HeapEntry {
            profile,
            generation,
        });
    }

    /// Replace the profile of `profile.state` if it is queued.
    ///
    /// Returns whether the state was queued.
    pub fn update(&mut self, profile: EpsilonProfile) -> bool {
        if self.handles.contains_key(&profile.state) {
            self.insert(profile);
            true
        } else {
            false
        }
    }

    /// Remove and return the profile of highest priority.
    pub fn pop(&mut self) -> Option<EpsilonProfile> {
        while let Some(entry) = self.heap.pop() {
            let live = self
                .handles
                .get(&entry.profile.state)
                .is_some_and(|(generation, _)| *generation == entry.generation);
            if live {
                self.handles.remove(&entry.profile.state);
                return Some(entry.profile);
            }
        }
        None
    }

    /// Current profile of a queued state.
    #[must_use]
    pub fn profile(&self, state: StateId) -> Option<&EpsilonProfile> {
        self.handles.get(&state).map(|(_, profile)| profile)
    }

    #[must_use]
    pub fn contains(&self, state: StateId) -> bool {
        self.handles.contains_key(&state)
    }

    /// Number of queued states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Live profiles, highest priority first. For diagnostics.
    #[must_use]
    pub fn ordered(&self) -> Vec<EpsilonProfile> {
        let mut profiles: Vec<EpsilonProfile> =
            self.handles.values().map(|(_, profile)| *profile).collect();
        profiles.sort_by(|a, b| b.cmp(a));
        profiles
    }
}

impl fmt::Display for EliminationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for profile in self.ordered() {
            write!(f, "{sep}{profile}")?;
            sep = " > ";
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(state: u64, in_sp: usize, out_sp: usize, outs: usize) -> EpsilonProfile {
        EpsilonProfile::new(StateId(state), in_sp, in_sp, out_sp, outs)
    }

    #[test]
    fn fewer_spontaneous_successors_first() {
        let a = profile(2, 1, 0, 3);
        let b = profile(3, 1, 1, 1);
        assert!(a > b);
    }

    #[test]
    fn then_fewer_successors() {
        let a = profile(2, 5, 0, 1);
        let b = profile(3, 1, 0, 2);
        assert!(a > b);
    }

    #[test]
    fn then_fewer_spontaneous_predecessors() {
        let a = profile(2, 1, 0, 1);
        let b = profile(3, 2, 0, 1);
        assert!(a > b);
    }

    #[test]
    fn ties_break_on_lowest_state() {
        let a = profile(2, 1, 0, 1);
        let b = profile(3, 1, 0, 1);
        assert!(a > b);
    }

    #[test]
    fn non_spontaneous_counts_are_derived() {
        let p = EpsilonProfile::new(StateId(4), 2, 5, 1, 3);
        assert_eq!(p.in_nsp, 3);
        assert_eq!(p.out_nsp, 2);
        assert_eq!(p.to_string(), "4o1O2i2I3");
        assert_eq!(p.added_bound(), 6);
    }

    #[test]
    fn queue_pops_in_priority_order() {
        let mut queue = EliminationQueue::new();
        queue.insert(profile(2, 1, 1, 2));
        queue.insert(profile(3, 1, 0, 2));
        queue.insert(profile(4, 1, 0, 1));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop())
            .map(|p| p.state)
            .collect();
        assert_eq!(order, vec![StateId(4), StateId(3), StateId(2)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn update_reorders_and_skips_stale_entries() {
        let mut queue = EliminationQueue::new();
        queue.insert(profile(2, 1, 0, 1));
        queue.insert(profile(3, 1, 0, 5));

        assert!(queue.update(profile(2, 1, 3, 9)));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.profile(StateId(2)).map(|p| p.out_sp), Some(3));

        assert_eq!(queue.pop().map(|p| p.state), Some(StateId(3)));
        assert_eq!(queue.pop().map(|p| p.state), Some(StateId(2)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn update_ignores_unqueued_states() {
        let mut queue = EliminationQueue::new();
        assert!(!queue.update(profile(7, 1, 0, 0)));
        assert!(queue.is_empty());
        assert!(!queue.contains(StateId(7)));
    }

    #[test]
    fn display_lists_highest_priority_first() {
        let mut queue = EliminationQueue::new();
        queue.insert(profile(3, 1, 1, 1));
        queue.insert(profile(2, 1, 0, 0));
        assert_eq!(queue.to_string(), "2o0O0i1I0 > 3o1O0i1I0");
    }
}
