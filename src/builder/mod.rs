//! Builders and macros for assembling the workflow.
//!
//! [`WorkflowBuilder`] wires collaborators into an orchestrator, and
//! [`lifecycle_enum!`](crate::lifecycle_enum) generates the named state and
//! event enums.

pub mod error;
pub mod macros;
pub mod workflow;

pub use error::BuildError;
pub use workflow::WorkflowBuilder;
