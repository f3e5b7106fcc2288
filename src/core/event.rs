//! External stimuli that request a lifecycle transition.

use thiserror::Error;

/// Raised when an event name does not belong to the closed event set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rebalance event '{0}'")]
pub struct ParseEventError(pub String);

crate::lifecycle_enum! {
    /// Event requesting a transition of a run.
    pub enum RebalanceEvent: ParseEventError {
        Start => "START",
        IngestData => "INGEST_DATA",
        ComputeEligibility => "COMPUTE_ELIGIBILITY",
        SelectConstituents => "SELECT_CONSTITUENTS",
        CalculateWeights => "CALCULATE_WEIGHTS",
        RequestReview => "REQUEST_REVIEW",
        Approve => "APPROVE",
        Publish => "PUBLISH",
        Cancel => "CANCEL",
        Fail => "FAIL",
    }
}

impl RebalanceEvent {
    /// Check if the event is keyed on the event alone rather than on a state.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Cancel | Self::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancel_and_fail_are_wildcards() {
        let wildcards: Vec<_> = RebalanceEvent::ALL
            .iter()
            .filter(|e| e.is_wildcard())
            .copied()
            .collect();
        assert_eq!(wildcards, vec![RebalanceEvent::Cancel, RebalanceEvent::Fail]);
    }

    #[test]
    fn parses_every_canonical_name() {
        for event in RebalanceEvent::ALL {
            assert_eq!(event.name().parse::<RebalanceEvent>(), Ok(*event));
        }
    }

    #[test]
    fn lowercase_names_are_caller_errors() {
        assert_eq!(
            "approve".parse::<RebalanceEvent>(),
            Err(ParseEventError("approve".to_string()))
        );
    }
}
