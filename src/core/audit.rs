//! Append-only audit records of accepted transitions.

use super::event::RebalanceEvent;
use super::state::RebalanceState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable record of one accepted transition.
///
/// `effects` holds the type tags of the effects the transition emitted,
/// in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub run_id: String,
    pub index_code: String,
    pub effective_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
    pub event: RebalanceEvent,
    pub old_state: RebalanceState,
    pub new_state: RebalanceState,
    pub message: String,
    pub effects: Vec<String>,
}

/// Ordered audit entries of a single run.
///
/// # Example
///
/// ```rust
/// use chrono::{NaiveDate, Utc};
/// use rebalance::core::{AuditEntry, AuditTrail, RebalanceEvent, RebalanceState};
///
/// let entry = AuditEntry {
///     run_id: "run-1".to_string(),
///     index_code: "IDX".to_string(),
///     effective_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     occurred_at: Utc::now(),
///     event: RebalanceEvent::Cancel,
///     old_state: RebalanceState::Draft,
///     new_state: RebalanceState::Cancelled,
///     message: "Run run-1 cancelled".to_string(),
///     effects: vec!["RebalanceCancelled".to_string()],
/// };
///
/// let trail = AuditTrail::new(vec![entry]);
/// assert_eq!(trail.path(), vec![RebalanceState::Draft, RebalanceState::Cancelled]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    pub fn new(entries: Vec<AuditEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// States traversed: the first entry's old state, then every new state.
    pub fn path(&self) -> Vec<RebalanceState> {
        let mut path = Vec::with_capacity(self.entries.len() + 1);
        if let Some(first) = self.entries.first() {
            path.push(first.old_state);
        }
        path.extend(self.entries.iter().map(|entry| entry.new_state));
        path
    }

    /// Time between the first and the last recorded transition.
    ///
    /// `None` when empty or when timestamps run backwards.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.first()?, self.entries.last()?);
        last.occurred_at
            .signed_duration_since(first.occurred_at)
            .to_std()
            .ok()
    }

    pub fn into_entries(self) -> Vec<AuditEntry> {
        self.entries
    }
}

impl From<Vec<AuditEntry>> for AuditTrail {
    fn from(entries: Vec<AuditEntry>) -> Self {
        Self::new(entries)
    }
}
