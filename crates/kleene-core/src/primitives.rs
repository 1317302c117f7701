//! # Primitives
//!
//! Reserved identifiers and fixed constants shared by every automaton.
//!
//! Every `MutableAutomaton` owns two hidden states:
//!
//! 1. **Pre-initial state**: initial weights are the weights of `Special`
//!    arrows leaving it.
//! 2. **Post-final state**: final weights are the weights of `Special`
//!    arrows entering it.
//!
//! Encoding initial and final weights as transitions lets the eliminator
//! treat "outgoing transition" and "final weight" uniformly.

use crate::StateId;

/// The hidden state whose outgoing arrows carry initial weights.
pub const PRE_STATE: StateId = StateId(0);

/// The hidden state whose incoming arrows carry final weights.
pub const POST_STATE: StateId = StateId(1);

/// The first identifier handed out by `new_state`.
pub const FIRST_STATE: StateId = StateId(2);

/// Sentinel used by state maps for "no corresponding state".
pub const NULL_STATE: StateId = StateId(u64::MAX);

/// Debug level from which every elimination step is logged.
pub const DEBUG_STEPS: u8 = 1;

/// Debug level from which the priority queue is dumped before and after
/// each elimination step.
pub const DEBUG_QUEUE: u8 = 2;

/// Whether `state` is one of the two hidden states.
#[must_use]
pub const fn is_hidden(state: StateId) -> bool {
    state.0 == PRE_STATE.0 || state.0 == POST_STATE.0
}
