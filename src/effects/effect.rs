//! Side-effect descriptors emitted by transitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reason carried by the FAIL wildcard.
pub const UNKNOWN_FAILURE: &str = "Unknown failure";

/// Immutable descriptor of a business occurrence for downstream systems.
///
/// The engine never executes effects. It only emits them, in order, for a
/// publisher to carry out. Business fields are copied from the run as they
/// were when the transition fired.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all_fields = "camelCase")]
pub enum Effect {
    RebalanceStarted {
        run_id: String,
    },
    DataSnapshotCaptured {
        run_id: String,
        market_data_as_of: Option<NaiveDate>,
        corporate_actions_as_of: Option<NaiveDate>,
    },
    EligibilityComputed {
        run_id: String,
    },
    ConstituentsSelected {
        run_id: String,
        proposed_composition_hash: Option<String>,
    },
    WeightsCalculated {
        run_id: String,
        proposed_composition_hash: Option<String>,
    },
    ReviewRequested {
        run_id: String,
    },
    RebalanceApproved {
        run_id: String,
    },
    CompositionPublished {
        run_id: String,
        index_code: String,
        effective_date: NaiveDate,
        final_composition_hash: Option<String>,
    },
    NotifyDownstreamSystems {
        run_id: String,
    },
    RebalanceCancelled {
        run_id: String,
    },
    RebalanceFailed {
        run_id: String,
        reason: String,
    },
}

impl Effect {
    /// Type tag recorded in audit entries and command results.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RebalanceStarted { .. } => "RebalanceStarted",
            Self::DataSnapshotCaptured { .. } => "DataSnapshotCaptured",
            Self::EligibilityComputed { .. } => "EligibilityComputed",
            Self::ConstituentsSelected { .. } => "ConstituentsSelected",
            Self::WeightsCalculated { .. } => "WeightsCalculated",
            Self::ReviewRequested { .. } => "ReviewRequested",
            Self::RebalanceApproved { .. } => "RebalanceApproved",
            Self::CompositionPublished { .. } => "CompositionPublished",
            Self::NotifyDownstreamSystems { .. } => "NotifyDownstreamSystems",
            Self::RebalanceCancelled { .. } => "RebalanceCancelled",
            Self::RebalanceFailed { .. } => "RebalanceFailed",
        }
    }

    /// Run the effect was emitted for.
    pub fn run_id(&self) -> &str {
        match self {
            Self::RebalanceStarted { run_id }
            | Self::DataSnapshotCaptured { run_id, .. }
            | Self::EligibilityComputed { run_id }
            | Self::ConstituentsSelected { run_id, .. }
            | Self::WeightsCalculated { run_id, .. }
            | Self::ReviewRequested { run_id }
            | Self::RebalanceApproved { run_id }
            | Self::CompositionPublished { run_id, .. }
            | Self::NotifyDownstreamSystems { run_id }
            | Self::RebalanceCancelled { run_id }
            | Self::RebalanceFailed { run_id, .. } => run_id,
        }
    }
}

/// Type tags of a list of effects, in order.
pub fn type_names(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .map(|effect| effect.type_name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_matches_variant() {
        let effect = Effect::RebalanceFailed {
            run_id: "run-1".to_string(),
            reason: UNKNOWN_FAILURE.to_string(),
        };
        assert_eq!(effect.type_name(), "RebalanceFailed");
        assert_eq!(effect.run_id(), "run-1");
    }

    #[test]
    fn type_names_preserve_order() {
        let effects = vec![
            Effect::CompositionPublished {
                run_id: "run-1".to_string(),
                index_code: "IDX".to_string(),
                effective_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                final_composition_hash: Some("final".to_string()),
            },
            Effect::NotifyDownstreamSystems {
                run_id: "run-1".to_string(),
            },
        ];

        assert_eq!(
            type_names(&effects),
            vec!["CompositionPublished", "NotifyDownstreamSystems"]
        );
    }

    #[test]
    fn effect_serializes_externally_tagged() {
        let effect = Effect::DataSnapshotCaptured {
            run_id: "run-1".to_string(),
            market_data_as_of: NaiveDate::from_ymd_opt(2025, 1, 30),
            corporate_actions_as_of: None,
        };

        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["DataSnapshotCaptured"]["runId"], "run-1");
        assert_eq!(json["DataSnapshotCaptured"]["marketDataAsOf"], "2025-01-30");
        assert!(json["DataSnapshotCaptured"]["corporateActionsAsOf"].is_null());
    }
}
