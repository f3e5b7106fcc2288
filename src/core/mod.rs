//! Pure domain types of the rebalance lifecycle.
//!
//! This module holds the aggregate, the closed state and event sets, the
//! guard predicates and the audit records. Nothing here performs I/O or
//! reads the clock.

mod audit;
mod event;
mod guard;
mod run;
mod state;

pub use audit::{AuditEntry, AuditTrail};
pub use event::{ParseEventError, RebalanceEvent};
pub use guard::{describe, guards, Guard, GuardCheck, GuardViolation};
pub use run::RebalanceRun;
pub use state::{ParseStateError, RebalanceState};
