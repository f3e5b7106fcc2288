//! Build errors for transition tables and workflow assembly.

use crate::core::{RebalanceEvent, RebalanceState};
use thiserror::Error;

/// Errors that can occur when building transition tables and orchestrators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Transition for state={state} and event={event} is defined twice")]
    DuplicateTransition {
        state: RebalanceState,
        event: RebalanceEvent,
    },

    #[error("Event {event} applies from any eligible state and cannot be added to the table")]
    WildcardEvent { event: RebalanceEvent },

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Run store not specified. Call .run_store(store) before .build()")]
    MissingRunStore,

    #[error("Audit store not specified. Call .audit_store(store) before .build()")]
    MissingAuditStore,

    #[error("Effect publisher not specified. Call .publisher(publisher) before .build()")]
    MissingPublisher,

    #[error("Clock not specified. Call .clock(clock) before .build()")]
    MissingClock,
}
