//! The (state, event) transition table.

use super::effect::Effect;
use super::transition::TransitionDefinition;
use crate::builder::BuildError;
use crate::core::{guards, Guard, RebalanceEvent, RebalanceRun, RebalanceState};
use std::collections::HashMap;

type TransitionKey = (RebalanceState, RebalanceEvent);

/// Read-only mapping from (state, event) to a transition definition.
///
/// Built once, never mutated afterwards, so it can be shared across
/// threads without locking. Wildcard events are not stored here.
#[derive(Clone, Debug)]
pub struct TransitionTable {
    definitions: HashMap<TransitionKey, TransitionDefinition>,
}

impl TransitionTable {
    pub fn builder() -> TransitionTableBuilder {
        TransitionTableBuilder::new()
    }

    /// The standard rebalance lifecycle.
    ///
    /// | From | Event | To | Guard |
    /// |---|---|---|---|
    /// | DRAFT | START | DRAFT | none |
    /// | DRAFT | INGEST_DATA | DATA_COLLECTED | prerequisites ready |
    /// | DATA_COLLECTED | COMPUTE_ELIGIBILITY | ELIGIBILITY_COMPUTED | none |
    /// | ELIGIBILITY_COMPUTED | SELECT_CONSTITUENTS | CONSTITUENTS_SELECTED | none |
    /// | CONSTITUENTS_SELECTED | CALCULATE_WEIGHTS | WEIGHTS_CALCULATED | none |
    /// | WEIGHTS_CALCULATED | REQUEST_REVIEW | REVIEW_PENDING | none |
    /// | REVIEW_PENDING | APPROVE | APPROVED | approvals granted |
    /// | APPROVED | PUBLISH | PUBLISHED | final composition set |
    pub fn standard() -> Self {
        use RebalanceEvent as E;
        use RebalanceState as S;

        let definitions = [
            (
                (S::Draft, E::Start),
                TransitionDefinition::new(S::Draft, |run| {
                    vec![Effect::RebalanceStarted {
                        run_id: id(run),
                    }]
                }),
            ),
            (
                (S::Draft, E::IngestData),
                TransitionDefinition::new(S::DataCollected, |run| {
                    vec![Effect::DataSnapshotCaptured {
                        run_id: id(run),
                        market_data_as_of: run.market_data_as_of,
                        corporate_actions_as_of: run.corporate_actions_as_of,
                    }]
                })
                .guarded(Guard::new(
                    "prerequisites ready",
                    guards::prerequisites_ready,
                )),
            ),
            (
                (S::DataCollected, E::ComputeEligibility),
                TransitionDefinition::new(S::EligibilityComputed, |run| {
                    vec![Effect::EligibilityComputed { run_id: id(run) }]
                }),
            ),
            (
                (S::EligibilityComputed, E::SelectConstituents),
                TransitionDefinition::new(S::ConstituentsSelected, |run| {
                    vec![Effect::ConstituentsSelected {
                        run_id: id(run),
                        proposed_composition_hash: run.proposed_composition_hash.clone(),
                    }]
                }),
            ),
            (
                (S::ConstituentsSelected, E::CalculateWeights),
                TransitionDefinition::new(S::WeightsCalculated, |run| {
                    vec![Effect::WeightsCalculated {
                        run_id: id(run),
                        proposed_composition_hash: run.proposed_composition_hash.clone(),
                    }]
                }),
            ),
            (
                (S::WeightsCalculated, E::RequestReview),
                TransitionDefinition::new(S::ReviewPending, |run| {
                    vec![Effect::ReviewRequested { run_id: id(run) }]
                }),
            ),
            (
                (S::ReviewPending, E::Approve),
                TransitionDefinition::new(S::Approved, |run| {
                    vec![Effect::RebalanceApproved { run_id: id(run) }]
                })
                .guarded(Guard::new("approvals granted", guards::approvals_granted)),
            ),
            (
                (S::Approved, E::Publish),
                TransitionDefinition::new(S::Published, |run| {
                    vec![
                        Effect::CompositionPublished {
                            run_id: id(run),
                            index_code: run.index_code().to_string(),
                            effective_date: run.effective_date(),
                            final_composition_hash: run.final_composition_hash.clone(),
                        },
                        Effect::NotifyDownstreamSystems { run_id: id(run) },
                    ]
                })
                .guarded(Guard::new(
                    "final composition set",
                    guards::final_composition_set,
                )),
            ),
        ];

        Self {
            definitions: definitions.into_iter().collect(),
        }
    }

    pub fn get(&self, state: RebalanceState, event: RebalanceEvent) -> Option<&TransitionDefinition> {
        self.definitions.get(&(state, event))
    }

    /// Events registered for a state, in declaration order.
    pub fn events_from(&self, state: RebalanceState) -> Vec<RebalanceEvent> {
        RebalanceEvent::ALL
            .iter()
            .copied()
            .filter(|event| self.definitions.contains_key(&(state, *event)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn id(run: &RebalanceRun) -> String {
    run.run_id().to_string()
}

/// Builder for custom transition tables.
///
/// Registering the same (state, event) pair twice, or registering a
/// wildcard event, is reported by `build`.
pub struct TransitionTableBuilder {
    definitions: HashMap<TransitionKey, TransitionDefinition>,
    rejected: Option<BuildError>,
}

impl TransitionTableBuilder {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            rejected: None,
        }
    }

    /// Register a definition for a (state, event) pair.
    pub fn on(
        mut self,
        state: RebalanceState,
        event: RebalanceEvent,
        definition: TransitionDefinition,
    ) -> Self {
        if self.rejected.is_some() {
            return self;
        }
        if event.is_wildcard() {
            self.rejected = Some(BuildError::WildcardEvent { event });
        } else if self.definitions.contains_key(&(state, event)) {
            self.rejected = Some(BuildError::DuplicateTransition { state, event });
        } else {
            self.definitions.insert((state, event), definition);
        }
        self
    }

    /// Build the table.
    pub fn build(self) -> Result<TransitionTable, BuildError> {
        if let Some(err) = self.rejected {
            return Err(err);
        }
        if self.definitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }
        Ok(TransitionTable {
            definitions: self.definitions,
        })
    }
}

impl Default for TransitionTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
