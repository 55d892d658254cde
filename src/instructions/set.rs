//! Instruction set: the reusable table of actions and transitions.

use super::hook::{state_label, DefaultHook, Dispatch, FaultPolicy, Hook, HookResult};
use crate::core::State;
use crate::machine::StateMachine;
use std::collections::HashMap;
use std::fmt;

/// Hooks registered for one state.
pub struct StateMethods<S: State, C> {
    pub(crate) action: Option<Hook<S, C>>,
    pub(crate) transitions: HashMap<S, Hook<S, C>>,
}

impl<S: State, C> StateMethods<S, C> {
    fn new() -> Self {
        Self {
            action: None,
            transitions: HashMap::new(),
        }
    }

    /// The action to run while in this state, if one is registered.
    pub fn action(&self) -> Option<&Hook<S, C>> {
        self.action.as_ref()
    }

    /// The transition to run when leaving this state for `next`.
    pub fn transition(&self, next: &S) -> Option<&Hook<S, C>> {
        self.transitions.get(next)
    }

    /// Destinations with a dedicated transition from this state.
    pub fn destinations(&self) -> impl Iterator<Item = &S> {
        self.transitions.keys()
    }
}

/// Set of instructions for state machines.
///
/// Keeps the dedicated action of each state, the dedicated transitions
/// between pairs of states, and the default handlers used when nothing
/// dedicated applies. An instruction set exists independently of any
/// machine: the machine is passed to each dispatch, so many machines can
/// share one set behind an `Arc`, and one machine can be driven by
/// different sets over its lifetime.
///
/// Entries are created lazily on registration and never removed.
///
/// # Example
///
/// ```rust
/// use aid_fsm::{state_enum, InstructionSet, StateMachine};
/// use std::sync::Arc;
///
/// state_enum! {
///     enum Mood { Calm, Angry }
/// }
///
/// let mut instructions: InstructionSet<Mood, u32> = InstructionSet::new();
/// instructions.set_action(Mood::Angry, |machine| {
///     *machine.context_mut() += 1;
///     Ok(())
/// });
///
/// let mut machine = StateMachine::with_context(Arc::new(instructions), Mood::Calm, 0);
/// let _ = machine.act();
/// let _ = machine.transit(Mood::Angry);
/// let _ = machine.act();
///
/// assert_eq!(*machine.context(), 1);
/// ```
pub struct InstructionSet<S: State, C = ()> {
    states: HashMap<S, StateMethods<S, C>>,
    transit_default: Option<DefaultHook<S, C>>,
    act_default: Option<DefaultHook<S, C>>,
    fault_policy: FaultPolicy,
}

impl<S: State, C> InstructionSet<S, C> {
    /// Create an empty set with no-op default handlers.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            transit_default: None,
            act_default: None,
            fault_policy: FaultPolicy::default(),
        }
    }

    /// Define the dedicated transition from `current` to `next`.
    ///
    /// Replaces any transition already registered for the same pair.
    /// `current` and `next` may be equal.
    pub fn set_transition<F>(&mut self, current: S, next: S, transition: F)
    where
        F: Fn(&mut StateMachine<S, C>) -> HookResult + Send + Sync + 'static,
    {
        self.state_methods_mut(current)
            .transitions
            .insert(next, Box::new(transition));
    }

    /// Define the dedicated action for `current`, replacing any previous one.
    pub fn set_action<F>(&mut self, current: S, action: F)
    where
        F: Fn(&mut StateMachine<S, C>) -> HookResult + Send + Sync + 'static,
    {
        self.state_methods_mut(current).action = Some(Box::new(action));
    }

    /// Replace the handler run when no dedicated transition applies.
    pub fn set_transit_default<F>(&mut self, handler: F)
    where
        F: Fn(&mut StateMachine<S, C>) + Send + Sync + 'static,
    {
        self.transit_default = Some(Box::new(handler));
    }

    /// Replace the handler run when no dedicated action applies.
    pub fn set_act_default<F>(&mut self, handler: F)
    where
        F: Fn(&mut StateMachine<S, C>) + Send + Sync + 'static,
    {
        self.act_default = Some(Box::new(handler));
    }

    pub fn set_fault_policy(&mut self, policy: FaultPolicy) {
        self.fault_policy = policy;
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    /// Run the default transition handler. A no-op unless one was set.
    pub fn transit_default(&self, machine: &mut StateMachine<S, C>) {
        if let Some(handler) = &self.transit_default {
            handler(machine);
        }
    }

    /// Run the default action handler. A no-op unless one was set.
    pub fn act_default(&self, machine: &mut StateMachine<S, C>) {
        if let Some(handler) = &self.act_default {
            handler(machine);
        }
    }

    /// Transit `machine` from `current` to `next`.
    ///
    /// While the hook runs, `machine.state_next()` is `next`. Whatever the
    /// hook does, including failing or being absent, the transition commits:
    /// afterwards `state_current` is `next` and `state_next` is cleared.
    /// A panicking hook unwinds without committing, but `state_next` is
    /// still cleared.
    pub fn transit(
        &self,
        current: Option<&S>,
        next: S,
        machine: &mut StateMachine<S, C>,
    ) -> Dispatch {
        tracing::trace!(
            from = state_label(current),
            to = next.name(),
            "transit"
        );

        let mut pending = PendingTransit::begin(machine, next.clone());

        let transition = current
            .and_then(|state| self.states.get(state))
            .and_then(|methods| methods.transitions.get(&next));

        let dispatch = self.dispatch(transition, pending.machine, Self::transit_default);

        pending.machine.commit_transit(next, dispatch.kind());
        dispatch
    }

    /// Run the action registered for `current` on `machine`, or the default.
    pub fn act(&self, current: Option<&S>, machine: &mut StateMachine<S, C>) -> Dispatch {
        tracing::trace!(state = state_label(current), "act");

        let action = current
            .and_then(|state| self.states.get(state))
            .and_then(|methods| methods.action.as_ref());

        self.dispatch(action, machine, Self::act_default)
    }

    /// Hooks registered for `current`, if any were.
    pub fn state_methods(&self, current: &S) -> Option<&StateMethods<S, C>> {
        self.states.get(current)
    }

    pub fn has_action(&self, current: &S) -> bool {
        self.states
            .get(current)
            .is_some_and(|methods| methods.action.is_some())
    }

    pub fn has_transition(&self, current: &S, next: &S) -> bool {
        self.states
            .get(current)
            .is_some_and(|methods| methods.transitions.contains_key(next))
    }

    /// States that have at least one hook registered.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.states.keys()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Find the methods of `current`, creating an empty entry on first use.
    pub(crate) fn state_methods_mut(&mut self, current: S) -> &mut StateMethods<S, C> {
        self.states.entry(current).or_insert_with(StateMethods::new)
    }

    fn dispatch(
        &self,
        hook: Option<&Hook<S, C>>,
        machine: &mut StateMachine<S, C>,
        fallback: fn(&Self, &mut StateMachine<S, C>),
    ) -> Dispatch {
        let Some(hook) = hook else {
            fallback(self, machine);
            return Dispatch::Default;
        };

        match hook(machine) {
            Ok(()) => Dispatch::Dedicated,
            Err(error) => match self.fault_policy {
                FaultPolicy::Fallback => {
                    tracing::info!(%error, "hook failed, running default handler");
                    fallback(self, machine);
                    Dispatch::Recovered(error)
                }
                FaultPolicy::Surface => {
                    tracing::warn!(%error, "hook failed");
                    Dispatch::Faulted(error)
                }
            },
        }
    }
}

/// Marks a machine as in transit; clears `state_next` when dropped.
struct PendingTransit<'a, S: State, C> {
    machine: &'a mut StateMachine<S, C>,
}

impl<'a, S: State, C> PendingTransit<'a, S, C> {
    fn begin(machine: &'a mut StateMachine<S, C>, next: S) -> Self {
        machine.begin_transit(next);
        Self { machine }
    }
}

impl<S: State, C> Drop for PendingTransit<'_, S, C> {
    fn drop(&mut self) {
        self.machine.end_transit();
    }
}

impl<S: State, C> Default for InstructionSet<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, C> fmt::Debug for InstructionSet<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<&str> = self.states.keys().map(|s| s.name()).collect();
        f.debug_struct("InstructionSet")
            .field("states", &states)
            .field("fault_policy", &self.fault_policy)
            .field("transit_default", &self.transit_default.is_some())
            .field("act_default", &self.act_default.is_some())
            .finish()
    }
}
