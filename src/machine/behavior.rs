//! Attaching machines to a host update loop.
//!
//! Hosts tick their behaviours once per frame. A [`StateMachine`] acts as
//! a behaviour by running the action of its current state on each update;
//! transitions stay under the control of whatever events the host sees,
//! which reach a hosted machine through [`BehaviorHost::get_mut`].

use super::instance::StateMachine;
use crate::core::State;

/// Something a host updates once per tick.
pub trait Behavior {
    fn update(&mut self);

    /// Inactive behaviours are skipped by [`BehaviorHost::update`].
    fn is_active(&self) -> bool {
        true
    }
}

impl<S: State, C> Behavior for StateMachine<S, C> {
    fn update(&mut self) {
        // faults are already logged by the dispatch
        let _ = self.act();
    }

    fn is_active(&self) -> bool {
        StateMachine::is_active(self)
    }
}

impl<B: Behavior + ?Sized> Behavior for Box<B> {
    fn update(&mut self) {
        (**self).update();
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

/// Handle to a behaviour attached to a [`BehaviorHost`].
///
/// Ids are never reused, so a handle to a detached behaviour stays dead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BehaviorId(usize);

/// Owns behaviours and ticks them in attachment order.
///
/// A host of one machine type keeps full access to its machines; use the
/// default `Box<dyn Behavior>` to mix behaviour types.
pub struct BehaviorHost<B = Box<dyn Behavior>> {
    slots: Vec<Option<B>>,
    tick: u64,
}

impl<B: Behavior> BehaviorHost<B> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            tick: 0,
        }
    }

    /// Attach a behaviour and return its handle.
    pub fn attach(&mut self, behavior: B) -> BehaviorId {
        self.slots.push(Some(behavior));
        BehaviorId(self.slots.len() - 1)
    }

    /// Remove a behaviour from the host, handing it back.
    pub fn detach(&mut self, id: BehaviorId) -> Option<B> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn get(&self, id: BehaviorId) -> Option<&B> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: BehaviorId) -> Option<&mut B> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Attached behaviours with their handles, in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = (BehaviorId, &B)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|b| (BehaviorId(index), b)))
    }

    /// Update every active behaviour once. Returns how many were updated.
    pub fn update(&mut self) -> usize {
        let _span = tracing::trace_span!("behavior_update", tick = self.tick).entered();
        let mut updated = 0;
        for behavior in self.slots.iter_mut().flatten().filter(|b| b.is_active()) {
            behavior.update();
            updated += 1;
        }
        self.tick += 1;
        updated
    }

    /// Number of completed updates.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of attached behaviours.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: Behavior> Default for BehaviorHost<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::InstructionSet;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Patrol {
        Idle,
        Walk,
    }

    impl State for Patrol {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Walk => "Walk",
            }
        }
    }

    struct Sleeper;

    impl Behavior for Sleeper {
        fn update(&mut self) {
            panic!("inactive behaviours are never updated");
        }

        fn is_active(&self) -> bool {
            false
        }
    }

    #[test]
    fn state_machine_acts_on_update() {
        let mut instructions: InstructionSet<Patrol, u32> = InstructionSet::new();
        instructions.set_action(Patrol::Walk, |m| {
            *m.context_mut() += 1;
            Ok(())
        });

        let mut machine = StateMachine::with_context(Arc::new(instructions), Patrol::Walk, 0);
        machine.update();
        machine.update();
        machine.set_active(false);
        assert!(!Behavior::is_active(&machine));

        assert_eq!(*machine.context(), 2);
    }

    #[test]
    fn host_updates_active_behaviors_each_tick() {
        let steps = Arc::new(AtomicUsize::new(0));
        let mut instructions = InstructionSet::new();
        let counter = Arc::clone(&steps);
        instructions.set_action(Patrol::Walk, move |_: &mut StateMachine<Patrol>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let instructions = Arc::new(instructions);

        let mut host: BehaviorHost = BehaviorHost::new();
        host.attach(Box::new(StateMachine::new(Arc::clone(&instructions), Patrol::Walk)));
        host.attach(Box::new(StateMachine::new(Arc::clone(&instructions), Patrol::Idle)));
        host.attach(Box::new(StateMachine::new(instructions, Patrol::Walk)));
        host.attach(Box::new(Sleeper));

        assert_eq!(host.update(), 3);
        assert_eq!(host.update(), 3);

        assert_eq!(steps.load(Ordering::SeqCst), 4);
        assert_eq!(host.tick(), 2);
        assert_eq!(host.len(), 4);
    }

    fn counting_instructions() -> Arc<InstructionSet<Patrol, Vec<Patrol>>> {
        let mut instructions: InstructionSet<Patrol, Vec<Patrol>> = InstructionSet::new();
        instructions.set_action(Patrol::Idle, |m| {
            m.context_mut().push(Patrol::Idle);
            Ok(())
        });
        instructions.set_action(Patrol::Walk, |m| {
            m.context_mut().push(Patrol::Walk);
            Ok(())
        });
        Arc::new(instructions)
    }

    #[test]
    fn hosted_machine_transits_on_external_event() {
        let mut host = BehaviorHost::new();
        let guard = host.attach(StateMachine::with_context(
            counting_instructions(),
            Patrol::Idle,
            Vec::new(),
        ));
        host.update();

        let machine = host.get_mut(guard).unwrap();
        assert!(machine.transit(Patrol::Walk).is_default());
        host.update();

        let machine = host.get(guard).unwrap();
        assert_eq!(machine.state_current(), Some(&Patrol::Walk));
        assert_eq!(machine.context(), &vec![Patrol::Idle, Patrol::Walk]);
    }

    #[test]
    fn inactive_machines_are_skipped() {
        let mut host = BehaviorHost::new();
        let first = host.attach(StateMachine::with_context(
            counting_instructions(),
            Patrol::Walk,
            Vec::new(),
        ));
        let second = host.attach(StateMachine::with_context(
            counting_instructions(),
            Patrol::Walk,
            Vec::new(),
        ));

        host.get_mut(second).unwrap().set_active(false);
        assert_eq!(host.update(), 1);

        host.get_mut(second).unwrap().set_active(true);
        assert_eq!(host.update(), 2);

        assert_eq!(host.get(first).unwrap().context().len(), 2);
        assert_eq!(host.get(second).unwrap().context().len(), 1);
    }

    #[test]
    fn detach_hands_machine_back() {
        let mut host = BehaviorHost::new();
        let first = host.attach(StateMachine::new(Arc::new(InstructionSet::new()), Patrol::Idle));
        let second = host.attach(StateMachine::new(Arc::new(InstructionSet::new()), Patrol::Walk));

        let machine = host.detach(first).unwrap();
        assert_eq!(machine.state_current(), Some(&Patrol::Idle));

        assert!(host.detach(first).is_none());
        assert!(host.get(first).is_none());
        assert_eq!(host.len(), 1);
        assert_eq!(host.update(), 1);

        let ids: Vec<BehaviorId> = host.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![second]);
    }
}
