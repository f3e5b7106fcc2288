//! Imperative shell around the pure state machine.
//!
//! The orchestrator loads a run, asks the state machine for a decision,
//! then saves the run, appends the audit entry and publishes the effects
//! through injected collaborators. Commands against the same run are
//! serialized; different runs proceed in parallel.

mod clock;
mod command;
mod error;
mod memory;
mod orchestrator;
mod ports;
mod publisher;

pub use clock::{FixedClock, SystemClock};
pub use command::{CommandResult, CreateRunRequest};
pub use error::{PublishError, StoreError, WorkflowError};
pub use memory::{InMemoryAuditStore, InMemoryRunStore};
pub use orchestrator::WorkflowOrchestrator;
pub use ports::{AuditStore, Clock, EffectPublisher, RunStore};
pub use publisher::{LoggingEffectPublisher, RecordingPublisher};
