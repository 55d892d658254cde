//! Builder for constructing instruction sets.

use crate::core::State;
use crate::instructions::{FaultPolicy, HookResult, InstructionSet};
use crate::machine::StateMachine;
use std::sync::Arc;

/// Builder for instruction sets with a fluent API.
///
/// # Example
///
/// ```
/// use aid_fsm::builder::InstructionSetBuilder;
/// use aid_fsm::instructions::FaultPolicy;
/// use aid_fsm::{state_enum, StateMachine};
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
///
/// let instructions = InstructionSetBuilder::<Door, Vec<&str>>::new()
///     .transition(Door::Open, Door::Closed, |m| {
///         m.context_mut().push("slam");
///         Ok(())
///     })
///     .transit_default(|m| m.context_mut().push("creak"))
///     .on_fault(FaultPolicy::Surface)
///     .shared();
///
/// let mut door = StateMachine::with_context(instructions, Door::Open, Vec::new());
/// let _ = door.transit(Door::Closed);
/// let _ = door.transit(Door::Open);
///
/// assert_eq!(door.context(), &vec!["slam", "creak"]);
/// ```
pub struct InstructionSetBuilder<S: State, C = ()> {
    instructions: InstructionSet<S, C>,
}

impl<S: State, C> InstructionSetBuilder<S, C> {
    pub fn new() -> Self {
        Self {
            instructions: InstructionSet::new(),
        }
    }

    /// Register the action for `state`.
    pub fn action<F>(mut self, state: S, action: F) -> Self
    where
        F: Fn(&mut StateMachine<S, C>) -> HookResult + Send + Sync + 'static,
    {
        self.instructions.set_action(state, action);
        self
    }

    /// Register the transition from `current` to `next`.
    pub fn transition<F>(mut self, current: S, next: S, transition: F) -> Self
    where
        F: Fn(&mut StateMachine<S, C>) -> HookResult + Send + Sync + 'static,
    {
        self.instructions.set_transition(current, next, transition);
        self
    }

    pub fn transit_default<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut StateMachine<S, C>) + Send + Sync + 'static,
    {
        self.instructions.set_transit_default(handler);
        self
    }

    pub fn act_default<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut StateMachine<S, C>) + Send + Sync + 'static,
    {
        self.instructions.set_act_default(handler);
        self
    }

    /// Set how failed hooks are handled (default: [`FaultPolicy::Fallback`]).
    pub fn on_fault(mut self, policy: FaultPolicy) -> Self {
        self.instructions.set_fault_policy(policy);
        self
    }

    pub fn build(self) -> InstructionSet<S, C> {
        self.instructions
    }

    /// Build the set behind an `Arc`, ready to be shared by machines.
    pub fn shared(self) -> Arc<InstructionSet<S, C>> {
        Arc::new(self.instructions)
    }
}

impl<S: State, C> Default for InstructionSetBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
