//! Collaborator interfaces the orchestrator sequences calls to.
//!
//! Storage technology and transport live behind these traits. Every port
//! is `Send + Sync` and takes `&self`, so one orchestrator can be shared
//! across threads.

use super::error::{PublishError, StoreError};
use crate::core::{AuditEntry, RebalanceRun};
use crate::effects::Effect;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Keeps the current version of every run.
pub trait RunStore: Send + Sync {
    fn find_by_id(&self, run_id: &str) -> Result<Option<RebalanceRun>, StoreError>;

    /// Full upsert keyed by the run id.
    fn save(&self, run: &RebalanceRun) -> Result<(), StoreError>;
}

/// Append-only log of accepted transitions.
pub trait AuditStore: Send + Sync {
    fn append(&self, entry: &AuditEntry) -> Result<(), StoreError>;

    /// Entries of one run in insertion order.
    fn find_by_run_id(&self, run_id: &str) -> Result<Vec<AuditEntry>, StoreError>;
}

/// Carries effects to downstream systems.
///
/// Retry, dead-lettering or dropping are the publisher's own policy.
pub trait EffectPublisher: Send + Sync {
    /// Publish every effect, preserving order.
    fn publish_all(&self, effects: &[Effect]) -> Result<(), PublishError>;
}

/// Source of transition timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: RunStore + ?Sized> RunStore for Arc<T> {
    fn find_by_id(&self, run_id: &str) -> Result<Option<RebalanceRun>, StoreError> {
        (**self).find_by_id(run_id)
    }

    fn save(&self, run: &RebalanceRun) -> Result<(), StoreError> {
        (**self).save(run)
    }
}

impl<T: AuditStore + ?Sized> AuditStore for Arc<T> {
    fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        (**self).append(entry)
    }

    fn find_by_run_id(&self, run_id: &str) -> Result<Vec<AuditEntry>, StoreError> {
        (**self).find_by_run_id(run_id)
    }
}

impl<T: EffectPublisher + ?Sized> EffectPublisher for Arc<T> {
    fn publish_all(&self, effects: &[Effect]) -> Result<(), PublishError> {
        (**self).publish_all(effects)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
