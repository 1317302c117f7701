//! # Proper
//!
//! Entry points of spontaneous-transition removal.
//!
//! A run goes through `Validating → Building → Eliminating → Done`, or ends
//! in `Failed`. Validation depends on the star status of the weightset:
//!
//! | Status | Valid when |
//! |--------|------------|
//! | `Starable` | always (no pre-check) |
//! | `NonStarable` | proper, or epsilon-acyclic |
//! | `Tops` | proper, epsilon-acyclic, or a trial elimination succeeds |
//! | `AbsVal` | proper, epsilon-acyclic, or a trial elimination succeeds on the absolute-value copy |
//!
//! Under `Starable` elimination can still fail with `NotStarable`; every
//! other status reports failures as `InvalidAutomaton`.

use crate::acyclic::is_eps_acyclic;
use crate::automaton::{AutomatonStore, MutableAutomaton};
use crate::config::{ProperAlgorithm, ProperConfig};
use crate::remover::{EliminationStats, EpsilonRemover, InPlaceRemover};
use crate::transform::{abs_copy, copy, transpose};
use crate::weightset::{StarStatus, WeightSet};
use crate::{Direction, KleeneError, Label};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

// =============================================================================
// VALIDITY
// =============================================================================

/// Validity strategy, one per star status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityCheck {
    /// No pre-check.
    Always,
    /// Proper or epsilon-acyclic.
    Acyclic,
    /// Proper, epsilon-acyclic, or trial elimination on a copy.
    Trial,
    /// Proper, epsilon-acyclic, or trial elimination on the absolute-value copy.
    AbsTrial,
}

impl ValidityCheck {
    #[must_use]
    pub const fn for_status(status: StarStatus) -> Self {
        match status {
            StarStatus::Starable => Self::Always,
            StarStatus::NonStarable => Self::Acyclic,
            StarStatus::Tops => Self::Trial,
            StarStatus::AbsVal => Self::AbsTrial,
        }
    }

    /// Strategy for the weightset `W`.
    #[must_use]
    pub const fn of<W: WeightSet>() -> Self {
        Self::for_status(W::STAR_STATUS)
    }

    /// Whether the structural shortcut (proper or epsilon-acyclic) applies.
    fn shortcut<A: AutomatonStore>(aut: &A) -> bool {
        is_proper(aut) || is_eps_acyclic(aut)
    }

    /// Whether elimination on `aut` completes without a star failure.
    pub fn holds<A: AutomatonStore>(self, aut: &A) -> bool {
        match self {
            Self::Always => true,
            Self::Acyclic => Self::shortcut(aut),
            Self::Trial => Self::shortcut(aut) || trial(aut),
            Self::AbsTrial => {
                Self::shortcut(aut) || abs_copy(aut).is_ok_and(|abs| trial(&abs))
            }
        }
    }
}

/// Run a silent elimination on a private copy.
fn trial<A: AutomatonStore>(aut: &A) -> bool {
    EpsilonRemover::new(aut, ProperConfig::default())
        .and_then(EpsilonRemover::run)
        .is_ok()
}

// =============================================================================
// PHASES
// =============================================================================

/// Progress of a [`Properer`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProperPhase {
    Validating,
    Building,
    Eliminating,
    Done,
    Failed,
}

impl fmt::Display for ProperPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProperPhase::Validating => "validating",
            ProperPhase::Building => "building",
            ProperPhase::Eliminating => "eliminating",
            ProperPhase::Done => "done",
            ProperPhase::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Drives validation and elimination for automata over `W`.
///
/// The validity strategy is fixed by `W::STAR_STATUS`. A `Properer` can be
/// reused; `phase` and `stats` describe the last run.
#[derive(Debug, Clone)]
pub struct Properer<W: WeightSet> {
    config: ProperConfig,
    check: ValidityCheck,
    phase: ProperPhase,
    stats: Option<EliminationStats>,
    weights: PhantomData<W>,
}

impl<W: WeightSet> Default for Properer<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WeightSet> Properer<W> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ProperConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ProperConfig) -> Self {
        Self {
            config,
            check: ValidityCheck::of::<W>(),
            phase: ProperPhase::Validating,
            stats: None,
            weights: PhantomData,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProperConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> ProperPhase {
        self.phase
    }

    /// Statistics of the last successful elimination.
    #[must_use]
    pub fn stats(&self) -> Option<EliminationStats> {
        self.stats
    }

    fn enter(&mut self, phase: ProperPhase) {
        debug!(from = %self.phase, to = %phase, "proper phase");
        self.phase = phase;
    }

    fn fail(&mut self, err: KleeneError) -> KleeneError {
        self.enter(ProperPhase::Failed);
        debug!(error = %err, "proper failed");
        err
    }

    /// Failures during elimination, as reported to the caller.
    fn elimination_error(&self, err: KleeneError) -> KleeneError {
        match (self.check, err) {
            (ValidityCheck::Always, err) => err,
            (_, KleeneError::NotStarable { weightset, value }) => KleeneError::InvalidAutomaton(
                format!("{weightset}: star of {value} is undefined on an epsilon-cycle"),
            ),
            (_, err) => err,
        }
    }

    /// Validation for the copy-returning entry point.
    ///
    /// Under `Trial` with the separate engine, the elimination itself is the
    /// trial, so only the structural shortcut runs here.
    fn validate<A: AutomatonStore<Weights = W>>(&mut self, aut: &A) -> Result<(), KleeneError> {
        self.enter(ProperPhase::Validating);
        let valid = match (self.check, self.config.algorithm) {
            (ValidityCheck::Trial, ProperAlgorithm::Separate) => true,
            (check, _) => check.holds(aut),
        };
        if valid {
            Ok(())
        } else {
            Err(self.fail(KleeneError::InvalidAutomaton(format!(
                "epsilon-cycle without star in {}",
                aut.weightset().name()
            ))))
        }
    }

    /// A proper automaton equivalent to `aut`, which is left untouched.
    pub fn run<A: AutomatonStore<Weights = W>>(
        &mut self,
        aut: &A,
    ) -> Result<MutableAutomaton<W>, KleeneError> {
        self.stats = None;
        self.validate(aut)?;

        let result = match self.config.algorithm {
            ProperAlgorithm::Separate => self.run_separate(aut),
            ProperAlgorithm::InPlace => self.run_on_copy(aut),
        };
        match result {
            Ok((res, stats)) => {
                self.stats = Some(stats);
                self.enter(ProperPhase::Done);
                Ok(res)
            }
            Err(err) => {
                let err = self.elimination_error(err);
                Err(self.fail(err))
            }
        }
    }

    fn run_separate<A: AutomatonStore<Weights = W>>(
        &mut self,
        aut: &A,
    ) -> Result<(MutableAutomaton<W>, EliminationStats), KleeneError> {
        self.enter(ProperPhase::Building);
        let remover = EpsilonRemover::new(aut, self.config)?;
        self.enter(ProperPhase::Eliminating);
        remover.run()
    }

    fn run_on_copy<A: AutomatonStore<Weights = W>>(
        &mut self,
        aut: &A,
    ) -> Result<(MutableAutomaton<W>, EliminationStats), KleeneError> {
        self.enter(ProperPhase::Building);
        let mut res = copy(aut)?;
        let remover = InPlaceRemover::new(&mut res, self.config);
        self.enter(ProperPhase::Eliminating);
        let stats = remover.run()?;
        Ok((res, stats))
    }

    /// Remove the spontaneous transitions of `aut` itself.
    ///
    /// Validation happens before any mutation. `Backward` runs on the
    /// transposed automaton and transposes the result back.
    pub fn run_in_place(
        &mut self,
        aut: &mut MutableAutomaton<W>,
        direction: Direction,
    ) -> Result<(), KleeneError> {
        self.stats = None;
        self.enter(ProperPhase::Validating);
        if !self.check.holds(&*aut) {
            return Err(self.fail(KleeneError::InvalidAutomaton(format!(
                "epsilon-cycle without star in {}",
                aut.weightset().name()
            ))));
        }

        let result = match direction {
            Direction::Forward => self.eliminate_in_place(aut),
            Direction::Backward => self.eliminate_backward(aut),
        };
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.enter(ProperPhase::Done);
                Ok(())
            }
            Err(err) => {
                let err = self.elimination_error(err);
                Err(self.fail(err))
            }
        }
    }

    fn eliminate_in_place(
        &mut self,
        aut: &mut MutableAutomaton<W>,
    ) -> Result<EliminationStats, KleeneError> {
        self.enter(ProperPhase::Building);
        let remover = InPlaceRemover::new(aut, self.config);
        self.enter(ProperPhase::Eliminating);
        remover.run()
    }

    fn eliminate_backward(
        &mut self,
        aut: &mut MutableAutomaton<W>,
    ) -> Result<EliminationStats, KleeneError> {
        let mut transposed = transpose(&*aut)?;
        let stats = self.eliminate_in_place(&mut transposed)?;
        *aut = transpose(&transposed)?;
        Ok(stats)
    }
}

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Whether no transition of `aut` is spontaneous.
pub fn is_proper<A: AutomatonStore>(aut: &A) -> bool {
    aut.transitions()
        .into_iter()
        .all(|t| aut.label_of(t) != Some(Label::One))
}

/// Whether spontaneous-transition removal succeeds on `aut`.
pub fn is_valid<A: AutomatonStore>(aut: &A) -> bool {
    ValidityCheck::of::<A::Weights>().holds(aut)
}

/// A proper automaton equivalent to `aut`.
pub fn remove_epsilons<A: AutomatonStore>(
    aut: &A,
) -> Result<MutableAutomaton<A::Weights>, KleeneError> {
    remove_epsilons_with_config(aut, ProperConfig::default())
}

pub fn remove_epsilons_with_config<A: AutomatonStore>(
    aut: &A,
    config: ProperConfig,
) -> Result<MutableAutomaton<A::Weights>, KleeneError> {
    Properer::with_config(config).run(aut)
}

/// Make `aut` proper.
pub fn remove_epsilons_in_place<W: WeightSet>(
    aut: &mut MutableAutomaton<W>,
    direction: Direction,
) -> Result<(), KleeneError> {
    remove_epsilons_in_place_with_config(aut, direction, ProperConfig::default())
}

pub fn remove_epsilons_in_place_with_config<W: WeightSet>(
    aut: &mut MutableAutomaton<W>,
    direction: Direction,
    config: ProperConfig,
) -> Result<(), KleeneError> {
    Properer::with_config(config).run_in_place(aut, direction)
}

// =============================================================================
// TESTS
// =============================================================================
