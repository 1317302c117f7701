//! # State Elimination
//!
//! Removal of spontaneous transitions one state at a time.
//!
//! Eliminating a state `s` that has incoming spontaneous transitions:
//!
//! 1. collect every incoming spontaneous transition into a closure list of
//!    `(source, weight)` pairs, except a spontaneous self-loop whose weight
//!    `w` is replaced by `star = w*` (`one` when there is no loop);
//! 2. delete those transitions;
//! 3. multiply every outgoing transition of `s`, final arrow included, by
//!    `star`;
//! 4. for each closure pair `(p, h)` and each outgoing transition
//!    `s --a|k--> q`, add (accumulate, never overwrite) `p --a|h·k--> q`.
//!
//! Because final weights are arrows to the post-final state, step 4 also
//! accumulates `h·star·f` onto the final weight of `p` when `s` is final.
//!
//! Two engines implement this:
//! - [`EpsilonRemover`]: works on the split spontaneous/proper graphs
//! - [`InPlaceRemover`]: works inside a single automaton

mod inplace;
mod separate;

pub use inplace::InPlaceRemover;
pub use separate::EpsilonRemover;

use crate::automaton::AutomatonStore;
use crate::profile::EliminationQueue;
use crate::weightset::WeightSet;
use crate::{KleeneError, StateId, TransitionId};
use serde::{Deserialize, Serialize};
use std::fmt;

type ValueOf<A> = <<A as AutomatonStore>::Weights as WeightSet>::Value;

// =============================================================================
// STATISTICS
// =============================================================================

/// Counters accumulated over an elimination run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationStats {
    /// States whose incoming spontaneous transitions were removed.
    pub eliminated: usize,
    /// Upper bound on the transitions created (closure × outgoing).
    pub added: usize,
    /// Transitions deleted, pruned states' transitions included.
    pub removed: usize,
    /// States deleted because nothing led to them any more.
    pub pruned: usize,
}

impl EliminationStats {
    fn record(&mut self, removed: usize, added: usize, pruned: bool) {
        self.eliminated = self.eliminated.saturating_add(1);
        self.removed = self.removed.saturating_add(removed);
        self.added = self.added.saturating_add(added);
        if pruned {
            self.pruned = self.pruned.saturating_add(1);
        }
    }
}

impl fmt::Display for EliminationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} states, -{}+{} transitions, {} pruned",
            self.eliminated, self.removed, self.added, self.pruned
        )
    }
}

// =============================================================================
// SHARED STEPS
// =============================================================================

/// The weighted predecessors of an eliminated state.
struct Closure<V> {
    /// Star of the spontaneous self-loop weight, `one` without a loop.
    star: V,
    /// `(source, weight)` of every other incoming spontaneous transition.
    sources: Vec<(StateId, V)>,
    /// Number of transitions deleted.
    removed: usize,
}

/// Steps 1 and 2: turn the spontaneous transitions `incoming` of `state`
/// into a closure list, deleting them from `aut`.
///
/// On a star failure `aut` is left partially rewritten.
fn take_closure<A: AutomatonStore>(
    aut: &mut A,
    state: StateId,
    incoming: Vec<TransitionId>,
) -> Result<Closure<ValueOf<A>>, KleeneError> {
    let ws = aut.weightset().clone();
    let mut star = ws.one();
    let mut sources = Vec::with_capacity(incoming.len());
    let removed = incoming.len();

    for t in incoming {
        let tr = aut
            .transition(t)
            .cloned()
            .ok_or(KleeneError::TransitionNotFound(t))?;
        if tr.src == state {
            star = ws.star(&tr.weight)?;
        } else {
            sources.push((tr.src, tr.weight));
        }
        aut.del_transition(t)?;
    }

    Ok(Closure {
        star,
        sources,
        removed,
    })
}

/// Emit the queue at `trace` level when `debug_level` asks for it.
fn trace_queue(debug_level: u8, when: &str, queue: &EliminationQueue) {
    if debug_level >= crate::primitives::DEBUG_QUEUE {
        tracing::trace!(%queue, "{when}");
    }
}

// =============================================================================
// TESTS
// =============================================================================
