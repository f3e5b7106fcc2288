//! Transport-free request and response values of the control entry points.

use crate::core::{AuditEntry, RebalanceRun, RebalanceState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Request materializing a new run in `DRAFT`.
///
/// Prerequisite and result fields are optional and copied onto the run
/// when present.
///
/// # Example
///
/// ```rust
/// use rebalance::workflow::CreateRunRequest;
///
/// let request: CreateRunRequest = serde_json::from_str(
///     r#"{"runId":"run-1","indexCode":"IDX","effectiveDate":"2025-01-31","approvals":true}"#,
/// ).unwrap();
///
/// let run = request.into_run();
/// assert!(run.approvals);
/// assert!(run.market_data_as_of.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRunRequest {
    pub run_id: String,
    pub index_code: String,
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub market_data_as_of: Option<NaiveDate>,
    #[serde(default)]
    pub corporate_actions_as_of: Option<NaiveDate>,
    #[serde(default)]
    pub approvals: Option<bool>,
    #[serde(default)]
    pub proposed_composition_hash: Option<String>,
    #[serde(default)]
    pub final_composition_hash: Option<String>,
}

impl CreateRunRequest {
    pub fn new(
        run_id: impl Into<String>,
        index_code: impl Into<String>,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            index_code: index_code.into(),
            effective_date,
            market_data_as_of: None,
            corporate_actions_as_of: None,
            approvals: None,
            proposed_composition_hash: None,
            final_composition_hash: None,
        }
    }

    /// Build the draft run described by the request.
    pub fn into_run(self) -> RebalanceRun {
        let mut run = RebalanceRun::new(self.run_id, self.index_code, self.effective_date);
        run.market_data_as_of = self.market_data_as_of;
        run.corporate_actions_as_of = self.corporate_actions_as_of;
        run.approvals = self.approvals.unwrap_or(false);
        run.proposed_composition_hash = self.proposed_composition_hash;
        run.final_composition_hash = self.final_composition_hash;
        run
    }
}

/// Summary of an accepted command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub run_id: String,
    pub old_state: RebalanceState,
    pub new_state: RebalanceState,
    pub occurred_at: DateTime<Utc>,
    /// Effect type tags, in publish order
    pub effects: Vec<String>,
    pub audit_entry: AuditEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_leave_run_bare() {
        let run = CreateRunRequest::new("run-1", "IDX", NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
            .into_run();

        assert_eq!(run.state(), RebalanceState::Draft);
        assert!(!run.approvals);
        assert!(run.final_composition_hash.is_none());
    }

    #[test]
    fn request_copies_optional_fields() {
        let request: CreateRunRequest = serde_json::from_value(serde_json::json!({
            "runId": "run-1",
            "indexCode": "IDX",
            "effectiveDate": "2025-01-31",
            "marketDataAsOf": "2025-01-30",
            "corporateActionsAsOf": "2025-01-29",
            "proposedCompositionHash": "proposed",
            "finalCompositionHash": "final"
        }))
        .unwrap();

        let run = request.into_run();
        assert_eq!(run.run_id(), "run-1");
        assert_eq!(run.market_data_as_of, NaiveDate::from_ymd_opt(2025, 1, 30));
        assert_eq!(run.corporate_actions_as_of, NaiveDate::from_ymd_opt(2025, 1, 29));
        assert_eq!(run.proposed_composition_hash.as_deref(), Some("proposed"));
        assert_eq!(run.final_composition_hash.as_deref(), Some("final"));
        assert!(!run.approvals);
    }
}
