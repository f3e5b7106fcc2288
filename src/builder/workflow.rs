//! Builder for assembling a workflow orchestrator.

use crate::builder::error::BuildError;
use crate::effects::RebalanceStateMachine;
use crate::workflow::{
    AuditStore, Clock, EffectPublisher, InMemoryAuditStore, InMemoryRunStore,
    LoggingEffectPublisher, RunStore, SystemClock, WorkflowOrchestrator,
};
use std::sync::Arc;

/// Builder for wiring collaborators into a [`WorkflowOrchestrator`].
///
/// Every collaborator is required. The state machine defaults to
/// [`RebalanceStateMachine::new`].
///
/// # Example
///
/// ```rust
/// use rebalance::builder::WorkflowBuilder;
/// use rebalance::workflow::{
///     InMemoryAuditStore, InMemoryRunStore, LoggingEffectPublisher, SystemClock,
/// };
///
/// let orchestrator = WorkflowBuilder::new()
///     .run_store(InMemoryRunStore::new())
///     .audit_store(InMemoryAuditStore::new())
///     .publisher(LoggingEffectPublisher)
///     .clock(SystemClock)
///     .build()
///     .unwrap();
///
/// assert!(orchestrator.find_run("run-1").unwrap().is_none());
/// ```
#[derive(Default)]
pub struct WorkflowBuilder {
    runs: Option<Arc<dyn RunStore>>,
    audit: Option<Arc<dyn AuditStore>>,
    publisher: Option<Arc<dyn EffectPublisher>>,
    clock: Option<Arc<dyn Clock>>,
    machine: Option<RebalanceStateMachine>,
}

impl WorkflowBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with in-memory stores, a logging publisher and
    /// the system clock.
    pub fn in_memory() -> Self {
        Self::new()
            .run_store(InMemoryRunStore::new())
            .audit_store(InMemoryAuditStore::new())
            .publisher(LoggingEffectPublisher)
            .clock(SystemClock)
    }

    pub fn run_store<S: RunStore + 'static>(mut self, store: S) -> Self {
        self.runs = Some(Arc::new(store));
        self
    }

    pub fn audit_store<S: AuditStore + 'static>(mut self, store: S) -> Self {
        self.audit = Some(Arc::new(store));
        self
    }

    pub fn publisher<P: EffectPublisher + 'static>(mut self, publisher: P) -> Self {
        self.publisher = Some(Arc::new(publisher));
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Replace the standard state machine, e.g. with a custom table.
    pub fn machine(mut self, machine: RebalanceStateMachine) -> Self {
        self.machine = Some(machine);
        self
    }

    /// Build the orchestrator.
    /// Returns an error if a collaborator is missing.
    pub fn build(self) -> Result<WorkflowOrchestrator, BuildError> {
        let runs = self.runs.ok_or(BuildError::MissingRunStore)?;
        let audit = self.audit.ok_or(BuildError::MissingAuditStore)?;
        let publisher = self.publisher.ok_or(BuildError::MissingPublisher)?;
        let clock = self.clock.ok_or(BuildError::MissingClock)?;

        Ok(WorkflowOrchestrator::new(
            runs,
            audit,
            publisher,
            clock,
            self.machine.unwrap_or_default(),
        ))
    }
}
