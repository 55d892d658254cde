//! Core state types.
//!
//! - State definitions via the `State` trait
//! - Transition history recorded by every machine
//!
//! Nothing in this module runs hooks; dispatch lives in `instructions`.

mod history;
mod state;

pub use history::{DispatchKind, StateHistory, StateTransition};
pub use state::State;
