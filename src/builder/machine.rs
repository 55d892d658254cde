//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::instructions::InstructionSet;
use crate::machine::{StateMachine, DEFAULT_HISTORY_LIMIT};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// The initial state is optional; without one the machine starts unstarted
/// and enters its first state on the first `transit`.
pub struct StateMachineBuilder<S: State, C = ()> {
    instructions: Option<Arc<InstructionSet<S, C>>>,
    initial: Option<S>,
    history_limit: Option<usize>,
    context: C,
}

impl<S: State> StateMachineBuilder<S, ()> {
    /// Create a builder for a machine without context data.
    pub fn new() -> Self {
        Self::with_context(())
    }
}

impl<S: State, C> StateMachineBuilder<S, C> {
    /// Create a builder for a machine carrying `context`.
    pub fn with_context(context: C) -> Self {
        Self {
            instructions: None,
            initial: None,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            context,
        }
    }

    /// Set the instruction set (required).
    pub fn instructions(mut self, instructions: Arc<InstructionSet<S, C>>) -> Self {
        self.instructions = Some(instructions);
        self
    }

    /// Set the initial state.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Keep at most `limit` transitions in the history, `None` for all.
    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    /// Do not record transitions at all.
    pub fn without_history(self) -> Self {
        self.history_limit(Some(0))
    }

    /// Build the state machine.
    /// Returns an error if no instruction set was given.
    pub fn build(self) -> Result<StateMachine<S, C>, BuildError> {
        let instructions = self.instructions.ok_or(BuildError::MissingInstructions)?;

        let mut machine = match self.initial {
            Some(initial) => StateMachine::with_context(instructions, initial, self.context),
            None => StateMachine::unstarted(instructions, self.context),
        };
        machine.set_history_limit(self.history_limit);

        Ok(machine)
    }
}

impl<S: State> Default for StateMachineBuilder<S, ()> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::InstructionSetBuilder;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Processing => "Processing",
                Self::Complete => "Complete",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Complete)
        }
    }

    #[test]
    fn builder_requires_instructions() {
        let result = StateMachineBuilder::<TestState>::new()
            .initial(TestState::Initial)
            .build();

        assert!(matches!(result, Err(BuildError::MissingInstructions)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let instructions = InstructionSetBuilder::new()
            .transition(TestState::Initial, TestState::Processing, |_| Ok(()))
            .shared();

        let machine = StateMachineBuilder::new()
            .instructions(instructions)
            .initial(TestState::Initial)
            .build();

        assert!(machine.is_ok());
        let machine = machine.unwrap();
        assert_eq!(machine.state_current(), Some(&TestState::Initial));
    }

    #[test]
    fn builder_without_initial_state_is_unstarted() {
        let mut machine = StateMachineBuilder::<TestState, u8>::with_context(5)
            .instructions(Arc::new(InstructionSet::new()))
            .build()
            .unwrap();

        assert_eq!(machine.state_current(), None);
        assert_eq!(*machine.context(), 5);

        assert!(machine.transit(TestState::Complete).is_default());
        assert!(machine.is_final());
    }

    #[test]
    fn history_limit_is_applied() {
        let mut machine = StateMachineBuilder::<TestState>::new()
            .instructions(Arc::new(InstructionSet::new()))
            .initial(TestState::Initial)
            .history_limit(Some(1))
            .build()
            .unwrap();
        let _ = machine.transit(TestState::Processing);
        let _ = machine.transit(TestState::Complete);

        assert_eq!(machine.history().limit(), Some(1));
        assert_eq!(
            machine.history().get_path(),
            vec![&TestState::Processing, &TestState::Complete]
        );
    }

    #[test]
    fn without_history_records_nothing() {
        let mut machine = StateMachineBuilder::<TestState>::new()
            .instructions(Arc::new(InstructionSet::new()))
            .initial(TestState::Initial)
            .without_history()
            .build()
            .unwrap();
        let _ = machine.transit(TestState::Complete);

        assert!(machine.history().is_empty());
        assert_eq!(machine.state_current(), Some(&TestState::Complete));
    }
}
