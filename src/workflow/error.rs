//! Workflow error types.

use crate::core::ParseEventError;
use crate::effects::TransitionError;
use thiserror::Error;

/// Failure reported by a run or audit store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored record is unreadable: {0}")]
    Corrupt(String),
}

/// Failure reported by an effect publisher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("Publisher rejected effects: {0}")]
    Rejected(String),

    #[error("Publisher unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the orchestrator.
///
/// State machine failures pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Run already exists: {0}")]
    RunExists(String),

    #[error("Run identity must not change during an update: {0}")]
    IdentityChanged(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    UnknownEvent(#[from] ParseEventError),

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),

    /// The run was saved and audited before publishing failed.
    #[error("Effect publishing failed: {0}")]
    Publish(#[from] PublishError),
}

impl WorkflowError {
    /// Check if the failure came from a rejected guard.
    pub fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            Self::Transition(TransitionError::GuardFailed { .. })
        )
    }
}
