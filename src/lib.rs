//! Rebalance: a guarded workflow engine for index rebalance runs
//!
//! The crate follows a "pure core, imperative shell" split. The core
//! decides transitions with pure functions: a fixed transition table,
//! guards that report every violated precondition, and effect factories
//! that describe what should happen downstream. The shell, the workflow
//! orchestrator, loads runs, applies decisions and hands effects to a
//! publisher through injected collaborators.
//!
//! # Core Concepts
//!
//! - **Run**: one rebalance of one index for one effective date
//! - **Guards**: validations that must hold before a transition applies
//! - **Effects**: declarative descriptions of downstream work
//! - **Audit**: an immutable record of every accepted transition
//!
//! # Example
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use rebalance::core::{RebalanceEvent, RebalanceRun, RebalanceState};
//! use rebalance::effects::RebalanceStateMachine;
//!
//! let machine = RebalanceStateMachine::new();
//! let mut run = RebalanceRun::new("run-1", "IDX", NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
//! run.market_data_as_of = NaiveDate::from_ymd_opt(2025, 1, 30);
//! run.corporate_actions_as_of = NaiveDate::from_ymd_opt(2025, 1, 30);
//!
//! let result = machine
//!     .transition(&run, RebalanceEvent::IngestData, Utc::now())
//!     .unwrap();
//! run.apply(&result);
//!
//! assert_eq!(run.state(), RebalanceState::DataCollected);
//! assert_eq!(result.effects[0].type_name(), "DataSnapshotCaptured");
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;
pub mod workflow;

// Re-export commonly used types
pub use builder::{BuildError, WorkflowBuilder};
pub use checkpoint::RunSnapshot;
pub use core::{AuditEntry, RebalanceEvent, RebalanceRun, RebalanceState};
pub use effects::{Effect, RebalanceStateMachine, TransitionError, TransitionResult};
pub use workflow::{CommandResult, CreateRunRequest, WorkflowError, WorkflowOrchestrator};
