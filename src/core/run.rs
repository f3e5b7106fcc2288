//! The rebalance run aggregate.

use super::state::RebalanceState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow state and business data of one index rebalance.
///
/// Identity and scheduling attributes are fixed at creation. Prerequisite
/// and result fields are filled in by upstream computation before the
/// event that needs them fires. The lifecycle state only moves through
/// `RebalanceRun::apply`, fed by the state machine.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use rebalance::core::{RebalanceRun, RebalanceState};
///
/// let effective = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
/// let mut run = RebalanceRun::new("run-1", "INDEX_XYZ", effective);
/// run.market_data_as_of = NaiveDate::from_ymd_opt(2025, 1, 30);
///
/// assert_eq!(run.state(), RebalanceState::Draft);
/// assert!(!run.approvals);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceRun {
    run_id: String,
    index_code: String,
    effective_date: NaiveDate,
    state: RebalanceState,

    /// As-of date of the market data snapshot
    pub market_data_as_of: Option<NaiveDate>,
    /// As-of date of the corporate actions snapshot
    pub corporate_actions_as_of: Option<NaiveDate>,
    /// Whether reviewers signed off
    pub approvals: bool,

    /// Hash of the composition proposed by selection and weighting
    pub proposed_composition_hash: Option<String>,
    /// Hash of the composition to publish
    pub final_composition_hash: Option<String>,
}

impl RebalanceRun {
    /// Create a run in `Draft` with no prerequisites recorded.
    pub fn new(
        run_id: impl Into<String>,
        index_code: impl Into<String>,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            index_code: index_code.into(),
            effective_date,
            state: RebalanceState::Draft,
            market_data_as_of: None,
            corporate_actions_as_of: None,
            approvals: false,
            proposed_composition_hash: None,
            final_composition_hash: None,
        }
    }

    /// Rehydrate a run at a previously persisted lifecycle position.
    ///
    /// Meant for store adapters that keep runs in their own format.
    pub fn in_state(mut self, state: RebalanceState) -> Self {
        self.state = state;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn index_code(&self) -> &str {
        &self.index_code
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    pub fn state(&self) -> RebalanceState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: RebalanceState) {
        self.state = state;
    }
}
