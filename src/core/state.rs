//! Lifecycle states of a rebalance run.

use thiserror::Error;

/// Raised when a state name does not belong to the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rebalance state '{0}'")]
pub struct ParseStateError(pub String);

crate::lifecycle_enum! {
    /// Position of a run in its lifecycle.
    ///
    /// Runs start in `Draft` and move forward one step per accepted event.
    /// `Published`, `Cancelled` and `Failed` are terminal by intent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rebalance::core::RebalanceState;
    ///
    /// let state: RebalanceState = "REVIEW_PENDING".parse().unwrap();
    /// assert_eq!(state, RebalanceState::ReviewPending);
    /// assert!(!state.is_terminal());
    /// assert!(RebalanceState::Failed.accepts_wildcards());
    /// ```
    pub enum RebalanceState: ParseStateError {
        Draft => "DRAFT",
        DataCollected => "DATA_COLLECTED",
        EligibilityComputed => "ELIGIBILITY_COMPUTED",
        ConstituentsSelected => "CONSTITUENTS_SELECTED",
        WeightsCalculated => "WEIGHTS_CALCULATED",
        ReviewPending => "REVIEW_PENDING",
        Approved => "APPROVED",
        Published => "PUBLISHED",
        Cancelled => "CANCELLED",
        Failed => "FAILED",
    }
}

impl RebalanceState {
    /// Check if the lifecycle is meant to end here.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Published | Self::Cancelled | Self::Failed)
    }

    /// Check if CANCEL and FAIL apply from this state.
    ///
    /// Only `Published` and `Cancelled` are excluded. A `Failed` run can be
    /// cancelled or failed again.
    pub fn accepts_wildcards(&self) -> bool {
        !matches!(self, Self::Published | Self::Cancelled)
    }
}

impl Default for RebalanceState {
    fn default() -> Self {
        Self::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_has_ten_states() {
        assert_eq!(RebalanceState::ALL.len(), 10);
        assert_eq!(RebalanceState::ALL[0], RebalanceState::Draft);
    }

    #[test]
    fn is_terminal_identifies_end_states() {
        let terminal: Vec<_> = RebalanceState::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .copied()
            .collect();

        assert_eq!(
            terminal,
            vec![
                RebalanceState::Published,
                RebalanceState::Cancelled,
                RebalanceState::Failed
            ]
        );
    }

    #[test]
    fn failed_still_accepts_wildcards() {
        assert!(RebalanceState::Failed.accepts_wildcards());
        assert!(!RebalanceState::Published.accepts_wildcards());
        assert!(!RebalanceState::Cancelled.accepts_wildcards());
        assert!(RebalanceState::Approved.accepts_wildcards());
    }

    #[test]
    fn default_is_draft() {
        assert_eq!(RebalanceState::default(), RebalanceState::Draft);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "DONE".parse::<RebalanceState>().unwrap_err();
        assert_eq!(err, ParseStateError("DONE".to_string()));
        assert_eq!(err.to_string(), "unknown rebalance state 'DONE'");
    }
}
