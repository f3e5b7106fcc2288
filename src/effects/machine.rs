//! State machine that decides transitions of a rebalance run.

use super::effect::{type_names, Effect, UNKNOWN_FAILURE};
use super::table::TransitionTable;
use super::transition::{TransitionError, TransitionResult};
use crate::core::{AuditEntry, RebalanceEvent, RebalanceRun, RebalanceState};
use chrono::{DateTime, Utc};

/// Pure, synchronous decision function over a run.
///
/// Wildcard events (CANCEL, FAIL) are evaluated before the table so they
/// take priority over any state-specific rule. The machine never mutates
/// the run and never persists anything.
///
/// # Example
///
/// ```rust
/// use chrono::{NaiveDate, Utc};
/// use rebalance::core::{RebalanceEvent, RebalanceRun, RebalanceState};
/// use rebalance::effects::RebalanceStateMachine;
///
/// let machine = RebalanceStateMachine::new();
/// let run = RebalanceRun::new("run-1", "IDX", NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
///
/// let result = machine.transition(&run, RebalanceEvent::Cancel, Utc::now()).unwrap();
/// assert_eq!(result.new_state, RebalanceState::Cancelled);
/// assert_eq!(result.audit_entry.message, "Run run-1 cancelled");
/// ```
#[derive(Clone, Debug, Default)]
pub struct RebalanceStateMachine {
    table: TransitionTable,
}

impl RebalanceStateMachine {
    /// Create a machine over the standard lifecycle table.
    pub fn new() -> Self {
        Self::with_table(TransitionTable::standard())
    }

    /// Create a machine over a custom table. Wildcards still apply.
    pub fn with_table(table: TransitionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Decide the outcome of `event` for `run` at `occurred_at`.
    ///
    /// Fails with [`TransitionError::InvalidTransition`] when no rule applies
    /// and with [`TransitionError::GuardFailed`] when a guard rejects the
    /// event. A rejected event produces no audit entry.
    pub fn transition(
        &self,
        run: &RebalanceRun,
        event: RebalanceEvent,
        occurred_at: DateTime<Utc>,
    ) -> Result<TransitionResult, TransitionError> {
        let old_state = run.state();

        if let Some((new_state, effects, message)) = wildcard(run, event) {
            return Ok(complete(run, event, occurred_at, new_state, effects, message));
        }

        let definition = self
            .table
            .get(old_state, event)
            .ok_or(TransitionError::InvalidTransition {
                state: old_state,
                event,
            })?;

        definition.check(run)?;

        let effects = definition.effects_for(run);
        let new_state = definition.target;
        let message = format!(
            "Event {event} applied to run {}: {old_state} -> {new_state}",
            run.run_id()
        );
        Ok(complete(run, event, occurred_at, new_state, effects, message))
    }

    /// Events that would be accepted for the run as it is now (pure).
    pub fn permitted_events(&self, run: &RebalanceRun) -> Vec<RebalanceEvent> {
        RebalanceEvent::ALL
            .iter()
            .copied()
            .filter(|event| {
                wildcard(run, *event).is_some()
                    || self
                        .table
                        .get(run.state(), *event)
                        .is_some_and(|definition| definition.check(run).is_ok())
            })
            .collect()
    }
}

fn wildcard(
    run: &RebalanceRun,
    event: RebalanceEvent,
) -> Option<(RebalanceState, Vec<Effect>, String)> {
    if !run.state().accepts_wildcards() {
        return None;
    }
    let run_id = run.run_id().to_string();
    match event {
        RebalanceEvent::Cancel => Some((
            RebalanceState::Cancelled,
            vec![Effect::RebalanceCancelled {
                run_id: run_id.clone(),
            }],
            format!("Run {run_id} cancelled"),
        )),
        RebalanceEvent::Fail => Some((
            RebalanceState::Failed,
            vec![Effect::RebalanceFailed {
                run_id: run_id.clone(),
                reason: UNKNOWN_FAILURE.to_string(),
            }],
            format!("Run {run_id} failed"),
        )),
        _ => None,
    }
}

fn complete(
    run: &RebalanceRun,
    event: RebalanceEvent,
    occurred_at: DateTime<Utc>,
    new_state: RebalanceState,
    effects: Vec<Effect>,
    message: String,
) -> TransitionResult {
    let audit_entry = AuditEntry {
        run_id: run.run_id().to_string(),
        index_code: run.index_code().to_string(),
        effective_date: run.effective_date(),
        occurred_at,
        event,
        old_state: run.state(),
        new_state,
        message,
        effects: type_names(&effects),
    };
    TransitionResult {
        new_state,
        effects,
        audit_entry,
    }
}
