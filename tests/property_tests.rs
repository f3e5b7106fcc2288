//! Property-based tests for the rebalance state machine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated runs, events and timestamps.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rebalance::core::{RebalanceEvent, RebalanceRun, RebalanceState};
use rebalance::effects::{type_names, Effect, RebalanceStateMachine, TransitionError};

fn effective_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
}

fn arbitrary_state() -> impl Strategy<Value = RebalanceState> {
    prop::sample::select(RebalanceState::ALL.to_vec())
}

fn arbitrary_event() -> impl Strategy<Value = RebalanceEvent> {
    prop::sample::select(RebalanceEvent::ALL.to_vec())
}

prop_compose! {
    fn arbitrary_instant()(secs in 0i64..4_000_000_000) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }
}

prop_compose! {
    /// Dates within a week of the effective date, or unset.
    fn arbitrary_prerequisite()(offset in prop::option::of(-7i64..=7)) -> Option<NaiveDate> {
        offset.map(|days| effective_date() + Duration::days(days))
    }
}

prop_compose! {
    fn arbitrary_run()(
        state in arbitrary_state(),
        market_data_as_of in arbitrary_prerequisite(),
        corporate_actions_as_of in arbitrary_prerequisite(),
        approvals in any::<bool>(),
        final_composition_hash in prop::option::of("[a-f0-9]{8}"),
    ) -> RebalanceRun {
        let mut run = RebalanceRun::new("run-1", "INDEX_XYZ", effective_date()).in_state(state);
        run.market_data_as_of = market_data_as_of;
        run.corporate_actions_as_of = corporate_actions_as_of;
        run.approvals = approvals;
        run.final_composition_hash = final_composition_hash;
        run
    }
}

fn wildcard_eligible(state: RebalanceState) -> bool {
    !matches!(state, RebalanceState::Published | RebalanceState::Cancelled)
}

proptest! {
    #[test]
    fn cancel_applies_from_every_eligible_state(run in arbitrary_run(), at in arbitrary_instant()) {
        prop_assume!(wildcard_eligible(run.state()));

        let result = RebalanceStateMachine::new()
            .transition(&run, RebalanceEvent::Cancel, at)
            .unwrap();

        prop_assert_eq!(result.new_state, RebalanceState::Cancelled);
        prop_assert_eq!(
            result.effects,
            vec![Effect::RebalanceCancelled { run_id: "run-1".to_string() }]
        );
    }

    #[test]
    fn fail_applies_from_every_eligible_state(run in arbitrary_run(), at in arbitrary_instant()) {
        prop_assume!(wildcard_eligible(run.state()));

        let result = RebalanceStateMachine::new()
            .transition(&run, RebalanceEvent::Fail, at)
            .unwrap();

        prop_assert_eq!(result.new_state, RebalanceState::Failed);
        prop_assert_eq!(
            result.effects,
            vec![Effect::RebalanceFailed {
                run_id: "run-1".to_string(),
                reason: "Unknown failure".to_string(),
            }]
        );
    }

    #[test]
    fn wildcards_never_leave_published_or_cancelled(
        state in prop::sample::select(vec![RebalanceState::Published, RebalanceState::Cancelled]),
        event in prop::sample::select(vec![RebalanceEvent::Cancel, RebalanceEvent::Fail]),
        at in arbitrary_instant(),
    ) {
        let run = RebalanceRun::new("run-1", "INDEX_XYZ", effective_date()).in_state(state);

        let result = RebalanceStateMachine::new().transition(&run, event, at);
        prop_assert_eq!(result, Err(TransitionError::InvalidTransition { state, event }));
    }

    #[test]
    fn start_is_idempotent(repeats in 1usize..10, at in arbitrary_instant()) {
        let machine = RebalanceStateMachine::new();
        let mut run = RebalanceRun::new("run-1", "INDEX_XYZ", effective_date());

        for _ in 0..repeats {
            let result = machine.transition(&run, RebalanceEvent::Start, at).unwrap();
            prop_assert_eq!(result.new_state, RebalanceState::Draft);
            run.apply(&result);
        }
        prop_assert_eq!(run.state(), RebalanceState::Draft);
    }

    #[test]
    fn ingest_guard_matches_prerequisite_dates(
        market_data_as_of in arbitrary_prerequisite(),
        corporate_actions_as_of in arbitrary_prerequisite(),
        at in arbitrary_instant(),
    ) {
        let mut run = RebalanceRun::new("run-1", "INDEX_XYZ", effective_date());
        run.market_data_as_of = market_data_as_of;
        run.corporate_actions_as_of = corporate_actions_as_of;

        let ready = |date: Option<NaiveDate>| date.is_some_and(|d| d <= effective_date());
        let result = RebalanceStateMachine::new().transition(&run, RebalanceEvent::IngestData, at);

        if ready(market_data_as_of) && ready(corporate_actions_as_of) {
            prop_assert_eq!(result.unwrap().new_state, RebalanceState::DataCollected);
        } else {
            let is_guard_failure = matches!(result, Err(TransitionError::GuardFailed { .. }));
            prop_assert!(is_guard_failure);
        }
    }

    #[test]
    fn accepted_transitions_audit_faithfully(
        run in arbitrary_run(),
        event in arbitrary_event(),
        at in arbitrary_instant(),
    ) {
        if let Ok(result) = RebalanceStateMachine::new().transition(&run, event, at) {
            let entry = &result.audit_entry;
            prop_assert_eq!(&entry.run_id, "run-1");
            prop_assert_eq!(&entry.index_code, "INDEX_XYZ");
            prop_assert_eq!(entry.effective_date, effective_date());
            prop_assert_eq!(entry.event, event);
            prop_assert_eq!(entry.old_state, run.state());
            prop_assert_eq!(entry.new_state, result.new_state);
            prop_assert_eq!(entry.occurred_at, at);
            prop_assert_eq!(&entry.effects, &type_names(&result.effects));
            prop_assert!(!entry.message.trim().is_empty());
        }
    }

    #[test]
    fn transition_never_mutates_the_run(
        run in arbitrary_run(),
        event in arbitrary_event(),
        at in arbitrary_instant(),
    ) {
        let before = run.clone();
        let _ = RebalanceStateMachine::new().transition(&run, event, at);
        prop_assert_eq!(run, before);
    }

    #[test]
    fn permitted_events_are_exactly_the_accepted_ones(
        run in arbitrary_run(),
        at in arbitrary_instant(),
    ) {
        let machine = RebalanceStateMachine::new();
        let permitted = machine.permitted_events(&run);

        for event in RebalanceEvent::ALL {
            let accepted = machine.transition(&run, *event, at).is_ok();
            prop_assert_eq!(permitted.contains(event), accepted, "event {}", event);
        }
    }

    #[test]
    fn event_names_parse_back(event in arbitrary_event()) {
        prop_assert_eq!(event.name().parse::<RebalanceEvent>().unwrap(), event);
    }
}

#[test]
fn undefined_pair_is_invalid_transition() {
    let run = RebalanceRun::new("run-1", "INDEX_XYZ", effective_date());
    let result = RebalanceStateMachine::new().transition(&run, RebalanceEvent::Approve, Utc::now());

    assert_eq!(
        result,
        Err(TransitionError::InvalidTransition {
            state: RebalanceState::Draft,
            event: RebalanceEvent::Approve,
        })
    );
}
