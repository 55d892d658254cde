//! Instruction sets and hook dispatch.
//!
//! An [`InstructionSet`] maps each state to its action and to the
//! transitions leaving it. Dispatch checks for a registered hook first and
//! falls back to the default handler when there is none. What happens when
//! a registered hook returns an error is governed by the set's
//! [`FaultPolicy`]; the outcome is always reported as a [`Dispatch`].

mod hook;
mod set;

pub use hook::{DefaultHook, Dispatch, FaultPolicy, Hook, HookError, HookResult};
pub use set::{InstructionSet, StateMethods};

pub(crate) use hook::state_label;
