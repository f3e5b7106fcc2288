//! Serializable snapshots of a run and its audit trail.
//!
//! Snapshots let store adapters move a run between processes or archive
//! it once its lifecycle is over. They encode to JSON for readability and
//! to a compact binary form.

use crate::core::{AuditEntry, AuditTrail, RebalanceRun};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// A run together with every audit entry recorded for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// The run as stored
    pub run: RebalanceRun,

    /// Audit entries of the run, in insertion order
    pub audit: Vec<AuditEntry>,
}

impl RunSnapshot {
    pub fn capture(run: RebalanceRun, audit: Vec<AuditEntry>, taken_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            taken_at,
            run,
            audit,
        }
    }

    pub fn trail(&self) -> AuditTrail {
        AuditTrail::new(self.audit.clone())
    }

    /// Check version and that the audit trail belongs to the run and ends
    /// in the run's current state.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if let Some(foreign) = self
            .audit
            .iter()
            .find(|entry| entry.run_id != self.run.run_id())
        {
            return Err(CheckpointError::ForeignAuditEntry {
                run_id: self.run.run_id().to_string(),
                entry_run_id: foreign.run_id.clone(),
            });
        }
        if let Some(last) = self.audit.last() {
            if last.new_state != self.run.state() {
                return Err(CheckpointError::TrailStateMismatch {
                    run_id: self.run.run_id().to_string(),
                    trail_state: last.new_state,
                    run_state: self.run.state(),
                });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
