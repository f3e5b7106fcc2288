//! Snapshot error types.

use crate::core::RebalanceState;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or checking run snapshots
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Snapshot encoding failed: {0}")]
    SerializationFailed(String),

    #[error("Snapshot decoding failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The audit trail holds an entry recorded for another run
    #[error("Audit entry of run {entry_run_id} found in snapshot of run {run_id}")]
    ForeignAuditEntry {
        run_id: String,
        entry_run_id: String,
    },

    /// The last audit entry does not lead to the run's stored state
    #[error("Audit trail of run {run_id} ends in {trail_state} but the run is {run_state}")]
    TrailStateMismatch {
        run_id: String,
        trail_state: RebalanceState,
        run_state: RebalanceState,
    },
}
