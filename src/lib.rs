//! aid-fsm: a reusable finite state machine core
//!
//! Behaviour and runtime state are kept apart. An [`InstructionSet`] holds
//! the action of each state and the transitions between pairs of states,
//! plus default handlers used whenever nothing dedicated is registered. A
//! [`StateMachine`] only holds its current state, the next state while a
//! transition is under way, and a shared reference to its instructions, so
//! any number of machines can run off one set.
//!
//! # Core Concepts
//!
//! - **State**: hashable, serializable state values via the `State` trait
//! - **Instruction Set**: per-state actions and per-pair transitions
//! - **State Machine**: `transit(next)` and `act()` forwarded to the set
//! - **Dispatch**: reports whether the dedicated hook or a default handler ran
//!
//! # Example
//!
//! ```rust
//! use aid_fsm::{state_enum, InstructionSet, StateMachine};
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Guard { Patrol, Chase, Down }
//!     final: [Down]
//! }
//!
//! let mut instructions: InstructionSet<Guard, Vec<String>> = InstructionSet::new();
//! instructions.set_action(Guard::Patrol, |m| {
//!     m.context_mut().push("patrolling".into());
//!     Ok(())
//! });
//! instructions.set_transition(Guard::Patrol, Guard::Chase, |m| {
//!     let next = m.state_next().map(|s| format!("{s:?}"));
//!     m.context_mut().push(format!("spotted, going to {}", next.unwrap_or_default()));
//!     Ok(())
//! });
//!
//! let mut guard = StateMachine::with_context(Arc::new(instructions), Guard::Patrol, Vec::new());
//! let _ = guard.act();
//! assert!(guard.transit(Guard::Chase).is_dedicated());
//! assert!(guard.transit(Guard::Down).is_default());
//!
//! assert_eq!(guard.context(), &vec!["patrolling", "spotted, going to Chase"]);
//! assert!(guard.is_final());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod instructions;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{DispatchKind, State, StateHistory, StateTransition};
pub use instructions::{Dispatch, FaultPolicy, HookError, HookResult, InstructionSet};
pub use machine::{Behavior, BehaviorHost, BehaviorId, StateMachine};
