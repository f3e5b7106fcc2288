//! Effect descriptors and the state machine that emits them.
//!
//! # Key Concepts
//!
//! - **Effects**: immutable descriptors of side effects, emitted in order
//! - **Transition table**: read-only (state, event) mapping with optional guards
//! - **State machine**: wildcards first, then the table; returns a
//!   [`TransitionResult`] and leaves persistence to the caller

mod effect;
mod machine;
mod table;
mod transition;

pub use effect::{type_names, Effect, UNKNOWN_FAILURE};
pub use machine::RebalanceStateMachine;
pub use table::{TransitionTable, TransitionTableBuilder};
pub use transition::{EffectsFactory, TransitionDefinition, TransitionError, TransitionResult};
