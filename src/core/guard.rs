//! Guard predicates for controlling transitions.
//!
//! Guards are pure functions over a run. Instead of stopping at the first
//! unmet precondition they accumulate every violation with Stillwater's
//! `Validation`, so a rejected event reports all the data still missing.

use super::run::RebalanceRun;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single unmet precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("{field} must be present")]
    MissingPrerequisite { field: &'static str },

    #[error("{field} ({date}) must not be after effectiveDate ({effective_date})")]
    LatePrerequisite {
        field: &'static str,
        date: NaiveDate,
        effective_date: NaiveDate,
    },

    #[error("approvals must be granted to approve the rebalance")]
    ApprovalsMissing,

    #[error("finalCompositionHash must be set before publishing")]
    FinalCompositionMissing,
}

/// Outcome of evaluating a guard.
pub type GuardCheck = Validation<(), NonEmptyVec<GuardViolation>>;

/// Pure precondition evaluated against a run before a transition is accepted.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use rebalance::core::{guards, Guard, RebalanceRun};
///
/// let guard = Guard::new("approvals granted", guards::approvals_granted);
/// let mut run = RebalanceRun::new("run-1", "IDX", NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
///
/// assert!(guard.check(&run).is_failure());
/// run.approvals = true;
/// assert!(guard.check(&run).is_success());
/// ```
#[derive(Clone)]
pub struct Guard {
    name: &'static str,
    predicate: Arc<dyn Fn(&RebalanceRun) -> GuardCheck + Send + Sync>,
}

impl Guard {
    /// Create a guard from a pure check function.
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&RebalanceRun) -> GuardCheck + Send + Sync + 'static,
    {
        Guard {
            name,
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluate the guard without side effects.
    pub fn check(&self, run: &RebalanceRun) -> GuardCheck {
        (self.predicate)(run)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("name", &self.name).finish()
    }
}

/// Render accumulated violations as one human-readable reason.
pub fn describe(violations: &NonEmptyVec<GuardViolation>) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Guards of the standard rebalance lifecycle.
pub mod guards {
    use super::{GuardCheck, GuardViolation};
    use crate::core::run::RebalanceRun;
    use chrono::NaiveDate;
    use stillwater::validation::Validation;

    fn prerequisite_date(
        field: &'static str,
        value: Option<NaiveDate>,
        effective_date: NaiveDate,
    ) -> GuardCheck {
        match value {
            None => Validation::fail(GuardViolation::MissingPrerequisite { field }),
            Some(date) if date > effective_date => {
                Validation::fail(GuardViolation::LatePrerequisite {
                    field,
                    date,
                    effective_date,
                })
            }
            Some(_) => Validation::success(()),
        }
    }

    /// Both snapshot dates are recorded and none is after the effective date.
    pub fn prerequisites_ready(run: &RebalanceRun) -> GuardCheck {
        let effective_date = run.effective_date();
        Validation::all_vec(vec![
            prerequisite_date("marketDataAsOf", run.market_data_as_of, effective_date),
            prerequisite_date(
                "corporateActionsAsOf",
                run.corporate_actions_as_of,
                effective_date,
            ),
        ])
        .map(|_| ())
    }

    pub fn approvals_granted(run: &RebalanceRun) -> GuardCheck {
        if run.approvals {
            Validation::success(())
        } else {
            Validation::fail(GuardViolation::ApprovalsMissing)
        }
    }

    pub fn final_composition_set(run: &RebalanceRun) -> GuardCheck {
        if run.final_composition_hash.is_some() {
            Validation::success(())
        } else {
            Validation::fail(GuardViolation::FinalCompositionMissing)
        }
    }
}
