//! Core State trait for state machine states.
//!
//! A state is an opaque, comparable and hashable value identifying one mode
//! of a machine. Instruction sets key their tables by it, so it must be
//! usable as a `HashMap` key.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// States are conventionally unit enums. The core never interprets them
/// beyond equality and hashing; `is_final` and `is_error` are informational
/// and only surface through [`StateMachine::is_final`](crate::StateMachine::is_final).
///
/// # Required Traits
///
/// - `Clone`: states are copied into the machine and its history
/// - `Eq` + `Hash`: states key the instruction set tables
/// - `Debug`: states appear in logs
/// - `Serialize` + `Deserialize`: states are part of checkpoints
///
/// # Example
///
/// ```rust
/// use aid_fsm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum JobState {
///     Idle,
///     Walk,
///     Die,
/// }
///
/// impl State for JobState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Walk => "Walk",
///             Self::Die => "Die",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Die)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
