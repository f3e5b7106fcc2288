//! Rebalance Lifecycle Example
//!
//! Drives one rebalance run from DRAFT to PUBLISHED with in-memory
//! collaborators, showing a guard rejection along the way.
//!
//! Run with: RUST_LOG=debug cargo run --example rebalance_lifecycle

use chrono::NaiveDate;
use rebalance::builder::WorkflowBuilder;
use rebalance::core::RebalanceEvent;
use rebalance::workflow::CreateRunRequest;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Rebalance Lifecycle Example ===\n");

    let orchestrator = WorkflowBuilder::in_memory().build()?;

    let effective_date = NaiveDate::from_ymd_opt(2025, 1, 31).ok_or("invalid date")?;
    let mut request = CreateRunRequest::new("run-1", "INDEX_XYZ", effective_date);
    request.market_data_as_of = effective_date.pred_opt();
    request.corporate_actions_as_of = effective_date.pred_opt();
    request.proposed_composition_hash = Some("proposed-7f3a".to_string());
    orchestrator.create(request)?;

    for event in [
        RebalanceEvent::Start,
        RebalanceEvent::IngestData,
        RebalanceEvent::ComputeEligibility,
        RebalanceEvent::SelectConstituents,
        RebalanceEvent::CalculateWeights,
        RebalanceEvent::RequestReview,
    ] {
        let result = orchestrator.trigger("run-1", event)?;
        println!(
            "{event:<20} {} -> {}  effects: {:?}",
            result.old_state, result.new_state, result.effects
        );
    }

    println!("\nPermitted now: {:?}", orchestrator.permitted_events("run-1")?);

    match orchestrator.trigger("run-1", RebalanceEvent::Approve) {
        Ok(_) => println!("Approved without sign-off?"),
        Err(err) => println!("Approval rejected: {err}"),
    }

    orchestrator.update_run("run-1", |run| {
        run.approvals = true;
        run.final_composition_hash = Some("final-9c21".to_string());
    })?;

    for event in [RebalanceEvent::Approve, RebalanceEvent::Publish] {
        let result = orchestrator.trigger("run-1", event)?;
        println!(
            "{event:<20} {} -> {}  effects: {:?}",
            result.old_state, result.new_state, result.effects
        );
    }

    let trail = orchestrator.audit_trail("run-1")?;
    println!("\nAudit trail ({} entries):", trail.len());
    for entry in trail.entries() {
        println!("  {}", entry.message);
    }

    let snapshot = orchestrator.snapshot("run-1")?;
    println!("\nSnapshot {}:\n{}", snapshot.id, snapshot.to_json()?);

    Ok(())
}
