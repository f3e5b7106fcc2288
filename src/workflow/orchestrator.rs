//! Orchestrator sequencing the side-effecting steps around the state machine.

use super::command::{CommandResult, CreateRunRequest};
use super::error::WorkflowError;
use super::ports::{AuditStore, Clock, EffectPublisher, RunStore};
use crate::checkpoint::RunSnapshot;
use crate::core::{AuditEntry, AuditTrail, RebalanceEvent, RebalanceRun};
use crate::effects::{type_names, RebalanceStateMachine};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Per-run mutual exclusion.
///
/// Every command against a run holds that run's lock for its whole
/// load-decide-save-append-publish pipeline, so concurrent commands on the
/// same run cannot both read the same state. Different runs do not contend.
///
/// Entries only live while some command holds or waits for them.
#[derive(Debug, Default)]
struct RunLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RunLocks {
    fn for_run(&self, run_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(run_id.to_string()).or_default())
    }

    /// Drop the registry entry once no other command shares it.
    fn release(&self, run_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // The map's copy plus ours.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(run_id);
        }
    }

    fn serialized<T>(
        &self,
        run_id: &str,
        command: impl FnOnce() -> Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        let lock = self.for_run(run_id);
        let outcome = {
            let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
            command()
        };
        self.release(run_id, lock);
        outcome
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Drives runs through their lifecycle against injected collaborators.
///
/// Assemble one with [`crate::builder::WorkflowBuilder`].
pub struct WorkflowOrchestrator {
    runs: Arc<dyn RunStore>,
    audit: Arc<dyn AuditStore>,
    publisher: Arc<dyn EffectPublisher>,
    clock: Arc<dyn Clock>,
    machine: RebalanceStateMachine,
    locks: RunLocks,
}

impl WorkflowOrchestrator {
    pub fn new(
        runs: Arc<dyn RunStore>,
        audit: Arc<dyn AuditStore>,
        publisher: Arc<dyn EffectPublisher>,
        clock: Arc<dyn Clock>,
        machine: RebalanceStateMachine,
    ) -> Self {
        Self {
            runs,
            audit,
            publisher,
            clock,
            machine,
            locks: RunLocks::default(),
        }
    }

    pub fn machine(&self) -> &RebalanceStateMachine {
        &self.machine
    }

    /// Materialize a new run in `DRAFT`. Existing runs are never overwritten.
    pub fn create(&self, request: CreateRunRequest) -> Result<RebalanceRun, WorkflowError> {
        let run_id = request.run_id.clone();
        self.locks.serialized(&run_id, || {
            if self.runs.find_by_id(&run_id)?.is_some() {
                warn!(run_id = %run_id, "Refusing to overwrite existing run");
                return Err(WorkflowError::RunExists(run_id.clone()));
            }
            let run = request.into_run();
            self.runs.save(&run)?;
            info!(
                run_id = %run_id,
                index_code = run.index_code(),
                effective_date = %run.effective_date(),
                "Created rebalance run"
            );
            Ok(run)
        })
    }

    pub fn find_run(&self, run_id: &str) -> Result<Option<RebalanceRun>, WorkflowError> {
        Ok(self.runs.find_by_id(run_id)?)
    }

    /// Record upstream data (dates, approvals, hashes) on a run.
    ///
    /// The lifecycle state cannot be moved here; it is restored after the
    /// update. Changing the run id, index code or effective date is
    /// rejected and nothing is saved.
    pub fn update_run<F>(&self, run_id: &str, update: F) -> Result<RebalanceRun, WorkflowError>
    where
        F: FnOnce(&mut RebalanceRun),
    {
        self.locks.serialized(run_id, || {
            let mut run = self.load(run_id)?;
            let state = run.state();
            let index_code = run.index_code().to_string();
            let effective_date = run.effective_date();
            update(&mut run);
            if run.run_id() != run_id
                || run.index_code() != index_code
                || run.effective_date() != effective_date
            {
                warn!(run_id, "Refusing to change run identity");
                return Err(WorkflowError::IdentityChanged(run_id.to_string()));
            }
            let run = run.in_state(state);
            self.runs.save(&run)?;
            debug!(run_id, "Updated run data");
            Ok(run)
        })
    }

    /// Apply `event` to the run and carry out the consequences.
    ///
    /// Guard and invalid-transition failures are returned unchanged, with
    /// nothing saved or audited. A publish failure is returned after the
    /// run has been saved and the audit entry appended; neither is rolled
    /// back.
    pub fn trigger(
        &self,
        run_id: &str,
        event: RebalanceEvent,
    ) -> Result<CommandResult, WorkflowError> {
        self.locks
            .serialized(run_id, || self.trigger_locked(run_id, event))
    }

    /// Like [`Self::trigger`], for an event given by its canonical name.
    pub fn trigger_named(
        &self,
        run_id: &str,
        event_name: &str,
    ) -> Result<CommandResult, WorkflowError> {
        let event: RebalanceEvent = event_name.parse()?;
        self.trigger(run_id, event)
    }

    fn trigger_locked(
        &self,
        run_id: &str,
        event: RebalanceEvent,
    ) -> Result<CommandResult, WorkflowError> {
        debug!(run_id, %event, "Triggering event");
        let mut run = self.load(run_id)?;
        let old_state = run.state();
        let occurred_at = self.clock.now();

        let result = match self.machine.transition(&run, event, occurred_at) {
            Ok(result) => result,
            Err(err) => {
                warn!(run_id, %event, state = %old_state, error = %err, "Event rejected");
                return Err(err.into());
            }
        };

        run.apply(&result);
        self.runs.save(&run)?;
        self.audit.append(&result.audit_entry)?;
        info!(
            run_id,
            %event,
            old_state = %old_state,
            new_state = %result.new_state,
            effects = result.effects.len(),
            "Transition accepted"
        );

        if let Err(err) = self.publisher.publish_all(&result.effects) {
            error!(run_id, %event, error = %err, "Publishing effects failed after save");
            return Err(err.into());
        }

        Ok(CommandResult {
            run_id: run.run_id().to_string(),
            old_state,
            new_state: result.new_state,
            occurred_at,
            effects: type_names(&result.effects),
            audit_entry: result.audit_entry,
        })
    }

    /// Audit entries of a run, in insertion order.
    pub fn audit(&self, run_id: &str) -> Result<Vec<AuditEntry>, WorkflowError> {
        Ok(self.audit.find_by_run_id(run_id)?)
    }

    pub fn audit_trail(&self, run_id: &str) -> Result<AuditTrail, WorkflowError> {
        self.audit(run_id).map(AuditTrail::new)
    }

    /// Events the run would accept right now.
    pub fn permitted_events(&self, run_id: &str) -> Result<Vec<RebalanceEvent>, WorkflowError> {
        let run = self.load(run_id)?;
        Ok(self.machine.permitted_events(&run))
    }

    /// Consistent snapshot of a run and its audit trail.
    pub fn snapshot(&self, run_id: &str) -> Result<RunSnapshot, WorkflowError> {
        self.locks.serialized(run_id, || {
            let run = self.load(run_id)?;
            let audit = self.audit.find_by_run_id(run_id)?;
            Ok(RunSnapshot::capture(run, audit, self.clock.now()))
        })
    }

    fn load(&self, run_id: &str) -> Result<RebalanceRun, WorkflowError> {
        self.runs
            .find_by_id(run_id)?
            .ok_or_else(|| WorkflowError::RunNotFound(run_id.to_string()))
    }
}
