//! Machine instance holding the current and pending state.

use crate::core::{DispatchKind, State, StateHistory, StateTransition};
use crate::instructions::{Dispatch, InstructionSet};
use chrono::Utc;
use std::sync::Arc;

/// Transitions a machine keeps in its history unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Runtime state of one machine.
///
/// Holds the current state, the next state while a transition is under
/// way, a shared reference to the instructions driving it, and the
/// embedding application's data as `context`. All behaviour lives in the
/// [`InstructionSet`]; the machine only forwards to it.
#[derive(Debug)]
pub struct StateMachine<S: State, C = ()> {
    state_current: Option<S>,
    state_next: Option<S>,
    instructions: Arc<InstructionSet<S, C>>,
    context: C,
    history: StateHistory<S>,
    active: bool,
}

impl<S: State> StateMachine<S, ()> {
    /// Create a machine without context data in the `initial` state.
    pub fn new(instructions: Arc<InstructionSet<S, ()>>, initial: S) -> Self {
        Self::with_context(instructions, initial, ())
    }
}

impl<S: State, C> StateMachine<S, C> {
    /// Create a machine carrying `context` in the `initial` state.
    pub fn with_context(instructions: Arc<InstructionSet<S, C>>, initial: S, context: C) -> Self {
        Self {
            state_current: Some(initial),
            ..Self::unstarted(instructions, context)
        }
    }

    /// Create a machine that has no current state until its first transit.
    pub fn unstarted(instructions: Arc<InstructionSet<S, C>>, context: C) -> Self {
        Self {
            state_current: None,
            state_next: None,
            instructions,
            context,
            history: StateHistory::bounded(DEFAULT_HISTORY_LIMIT),
            active: true,
        }
    }

    /// Transit to `next`, running the transition registered for the pair
    /// (current, next) or the default one.
    pub fn transit(&mut self, next: S) -> Dispatch {
        let instructions = Arc::clone(&self.instructions);
        let current = self.state_current.clone();
        instructions.transit(current.as_ref(), next, self)
    }

    /// Run the action registered for the current state, or the default one.
    pub fn act(&mut self) -> Dispatch {
        let instructions = Arc::clone(&self.instructions);
        let current = self.state_current.clone();
        instructions.act(current.as_ref(), self)
    }

    pub fn state_current(&self) -> Option<&S> {
        self.state_current.as_ref()
    }

    /// The destination of the transition under way. `None` outside `transit`.
    pub fn state_next(&self) -> Option<&S> {
        self.state_next.as_ref()
    }

    pub fn instructions(&self) -> &Arc<InstructionSet<S, C>> {
        &self.instructions
    }

    /// Drive this machine with a different instruction set from now on.
    pub fn set_instructions(&mut self, instructions: Arc<InstructionSet<S, C>>) {
        self.instructions = instructions;
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Keep at most `limit` transitions in the history, or all of them
    /// with `None`. `Some(0)` turns recording off.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.history.set_limit(limit);
    }

    /// Whether a [`BehaviorHost`](super::BehaviorHost) updates this machine.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch host updates on or off. Direct `act` and `transit` calls are
    /// unaffected.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Check if the current state is final. An unstarted machine is not.
    pub fn is_final(&self) -> bool {
        self.state_current.as_ref().is_some_and(|state| state.is_final())
    }

    pub(crate) fn begin_transit(&mut self, next: S) {
        self.state_next = Some(next);
    }

    pub(crate) fn end_transit(&mut self) {
        self.state_next = None;
    }

    pub(crate) fn commit_transit(&mut self, next: S, kind: DispatchKind) {
        let record = StateTransition {
            from: self.state_current.take(),
            to: next.clone(),
            timestamp: Utc::now(),
            kind,
        };
        self.history.push(record);
        self.state_current = Some(next);
        self.state_next = None;
    }

    /// Replace state and history, keeping this machine's history limit.
    pub(crate) fn reset(&mut self, state_current: Option<S>, mut history: StateHistory<S>) {
        history.set_limit(self.history.limit());
        self.state_current = state_current;
        self.state_next = None;
        self.history = history;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::HookError;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Light {
        Red,
        Green,
        Yellow,
        Off,
    }

    impl State for Light {
        fn name(&self) -> &str {
            match self {
                Self::Red => "Red",
                Self::Green => "Green",
                Self::Yellow => "Yellow",
                Self::Off => "Off",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Off)
        }
    }

    #[test]
    fn new_machine_starts_in_initial_state() {
        let machine = StateMachine::new(Arc::new(InstructionSet::new()), Light::Red);

        assert_eq!(machine.state_current(), Some(&Light::Red));
        assert_eq!(machine.state_next(), None);
        assert!(machine.history().is_empty());
        assert!(!machine.is_final());
    }

    #[test]
    fn unstarted_machine_has_no_state() {
        let machine: StateMachine<Light, u8> =
            StateMachine::unstarted(Arc::new(InstructionSet::new()), 7);

        assert_eq!(machine.state_current(), None);
        assert!(!machine.is_final());
        assert_eq!(*machine.context(), 7);
    }

    #[test]
    fn transit_records_history() {
        let mut instructions = InstructionSet::new();
        instructions.set_transition(Light::Red, Light::Green, |_| Ok(()));
        instructions.set_transition(Light::Green, Light::Yellow, |_| Err(HookError::msg("bulb")));

        let mut machine = StateMachine::new(Arc::new(instructions), Light::Red);
        let _ = machine.transit(Light::Green);
        let _ = machine.transit(Light::Yellow);
        let _ = machine.transit(Light::Off);

        let kinds: Vec<DispatchKind> = machine
            .history()
            .transitions()
            .iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                DispatchKind::Dedicated,
                DispatchKind::Recovered,
                DispatchKind::Default
            ]
        );
        assert_eq!(
            machine.history().get_path(),
            vec![&Light::Red, &Light::Green, &Light::Yellow, &Light::Off]
        );
        assert!(machine.is_final());
    }

    #[test]
    fn act_leaves_state_untouched() {
        let mut instructions: InstructionSet<Light, Vec<Option<Light>>> = InstructionSet::new();
        instructions.set_action(Light::Green, |m| {
            let next = m.state_next().cloned();
            m.context_mut().push(next);
            Ok(())
        });

        let mut machine = StateMachine::with_context(Arc::new(instructions), Light::Green, vec![]);
        assert!(machine.act().is_dedicated());

        assert_eq!(machine.context(), &vec![None]);
        assert_eq!(machine.state_current(), Some(&Light::Green));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn hooks_can_mutate_context() {
        let mut instructions: InstructionSet<Light, u32> = InstructionSet::new();
        instructions.set_action(Light::Red, |m| {
            *m.context_mut() += 10;
            Ok(())
        });
        instructions.set_transition(Light::Red, Light::Green, |m| {
            *m.context_mut() += 1;
            Ok(())
        });

        let mut machine = StateMachine::with_context(Arc::new(instructions), Light::Red, 0);
        let _ = machine.act();
        let _ = machine.act();
        let _ = machine.transit(Light::Green);
        let _ = machine.act();

        assert_eq!(machine.into_context(), 21);
    }

    #[test]
    fn set_instructions_swaps_behaviour() {
        let mut calm: InstructionSet<Light, &'static str> = InstructionSet::new();
        calm.set_action(Light::Red, |m| {
            *m.context_mut() = "calm";
            Ok(())
        });
        let mut angry: InstructionSet<Light, &'static str> = InstructionSet::new();
        angry.set_action(Light::Red, |m| {
            *m.context_mut() = "angry";
            Ok(())
        });

        let mut machine = StateMachine::with_context(Arc::new(calm), Light::Red, "");
        let _ = machine.act();
        assert_eq!(*machine.context(), "calm");

        machine.set_instructions(Arc::new(angry));
        let _ = machine.act();
        assert_eq!(*machine.context(), "angry");
    }

    #[test]
    fn nested_transit_is_overridden_by_outer_commit() {
        let mut instructions: InstructionSet<Light, ()> = InstructionSet::new();
        instructions.set_transition(Light::Red, Light::Green, |m| {
            let _ = m.transit(Light::Off);
            Ok(())
        });

        let mut machine = StateMachine::new(Arc::new(instructions), Light::Red);
        let _ = machine.transit(Light::Green);

        assert_eq!(machine.state_current(), Some(&Light::Green));
        assert_eq!(machine.state_next(), None);
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn history_is_bounded_by_default() {
        let mut machine = StateMachine::new(Arc::new(InstructionSet::new()), Light::Red);
        for _ in 0..DEFAULT_HISTORY_LIMIT {
            let _ = machine.transit(Light::Green);
            let _ = machine.transit(Light::Red);
        }

        assert_eq!(machine.history().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(machine.history().limit(), Some(DEFAULT_HISTORY_LIMIT));
        assert_eq!(machine.history().last().map(|t| &t.to), Some(&Light::Red));
    }

    #[test]
    fn history_limit_can_be_changed() {
        let mut machine = StateMachine::new(Arc::new(InstructionSet::new()), Light::Red);
        machine.set_history_limit(Some(3));
        for next in [Light::Green, Light::Yellow, Light::Red, Light::Green, Light::Off] {
            let _ = machine.transit(next);
        }
        assert_eq!(
            machine.history().get_path(),
            vec![&Light::Yellow, &Light::Red, &Light::Green, &Light::Off]
        );

        machine.set_history_limit(Some(0));
        let _ = machine.transit(Light::Red);
        assert!(machine.history().is_empty());
        assert_eq!(machine.state_current(), Some(&Light::Red));
    }

    #[test]
    fn machines_start_active() {
        let mut machine = StateMachine::new(Arc::new(InstructionSet::new()), Light::Red);
        assert!(machine.is_active());

        machine.set_active(false);
        assert!(!machine.is_active());
    }
}
