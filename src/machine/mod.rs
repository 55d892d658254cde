//! Machine instances and their host integration.
//!
//! - **State Machine**: current state, pending next state, shared instructions
//! - **Behaviour**: per-tick hook a host calls to make a machine act

mod behavior;
mod instance;

pub use behavior::{Behavior, BehaviorHost, BehaviorId};
pub use instance::{StateMachine, DEFAULT_HISTORY_LIMIT};
