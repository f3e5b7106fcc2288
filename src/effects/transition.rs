//! Transition definitions, results and failures.

use super::effect::Effect;
use crate::core::{describe, AuditEntry, Guard, RebalanceEvent, RebalanceRun, RebalanceState};
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;

/// Errors that can occur when applying an event to a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Guard rejected transition: {reason}")]
    GuardFailed { reason: String },

    #[error("No transition defined for state={state} and event={event}")]
    InvalidTransition {
        state: RebalanceState,
        event: RebalanceEvent,
    },
}

/// Pure function producing the ordered effects of a transition.
///
/// Reads only fields already present on the run and never changes them.
pub type EffectsFactory = Arc<dyn Fn(&RebalanceRun) -> Vec<Effect> + Send + Sync>;

/// What happens when a registered (state, event) pair fires.
#[derive(Clone)]
pub struct TransitionDefinition {
    pub target: RebalanceState,
    pub guard: Option<Guard>,
    pub effects: EffectsFactory,
}

impl TransitionDefinition {
    /// Create an unguarded definition.
    pub fn new<F>(target: RebalanceState, effects: F) -> Self
    where
        F: Fn(&RebalanceRun) -> Vec<Effect> + Send + Sync + 'static,
    {
        Self {
            target,
            guard: None,
            effects: Arc::new(effects),
        }
    }

    /// Attach a guard that must pass before the transition is accepted.
    pub fn guarded(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Evaluate the guard, if any (pure).
    pub fn check(&self, run: &RebalanceRun) -> Result<(), TransitionError> {
        let Some(guard) = &self.guard else {
            return Ok(());
        };
        match guard.check(run) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(violations) => Err(TransitionError::GuardFailed {
                reason: describe(&violations),
            }),
        }
    }

    /// Compute the effects for the run as it is before the transition (pure).
    pub fn effects_for(&self, run: &RebalanceRun) -> Vec<Effect> {
        (self.effects)(run)
    }
}

impl fmt::Debug for TransitionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionDefinition")
            .field("target", &self.target)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

/// Outcome of an accepted transition.
///
/// Not persisted on its own: the caller applies `new_state` to the run,
/// appends `audit_entry` and publishes `effects` in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: RebalanceState,
    pub effects: Vec<Effect>,
    pub audit_entry: AuditEntry,
}

impl RebalanceRun {
    /// Move the run to the state decided by an accepted transition.
    pub fn apply(&mut self, result: &TransitionResult) {
        self.set_state(result.new_state);
    }
}
