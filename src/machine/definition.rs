//! Binding a configuration to a context and options.

use crate::core::{Event, State};
use crate::machine::config::{Action, ActionRef, GuardRef, MachineConfig, TransitionConfig};
use crate::machine::interpreter::MachineInterpreter;
use crate::machine::options::MachineOptions;
use crate::sync::{Machine, MachineDefinition, Snapshot};
use std::rc::Rc;

/// A [`MachineConfig`] bound to an initial context and its named
/// implementations.
pub struct StateMachine<S, C, E> {
    config: MachineConfig<S, C, E>,
    context: Rc<C>,
    options: MachineOptions<C, E>,
}

impl<S: State, C, E: Event> StateMachine<S, C, E> {
    pub fn new(config: MachineConfig<S, C, E>, initial_context: C) -> Self {
        Self {
            config,
            context: Rc::new(initial_context),
            options: MachineOptions::new(),
        }
    }

    pub fn config(&self) -> &MachineConfig<S, C, E> {
        &self.config
    }

    pub fn context(&self) -> &Rc<C> {
        &self.context
    }

    pub(crate) fn history_limit(&self) -> usize {
        self.options.resolved_history_limit()
    }

    /// First transition out of `state` for `event` whose guard passes.
    pub(crate) fn select(
        &self,
        state: &S,
        context: &C,
        event: &E,
    ) -> Option<&TransitionConfig<S, C, E>> {
        let node = self.config.node(state)?;
        node.candidates(event.event_type())
            .iter()
            .find(|transition| self.guard_passes(transition, context, event))
    }

    fn guard_passes(&self, transition: &TransitionConfig<S, C, E>, context: &C, event: &E) -> bool {
        match &transition.guard {
            None => true,
            Some(GuardRef::Inline(guard)) => guard.check(context, event),
            Some(GuardRef::Named(name)) => match self.options.find_guard(name) {
                Some(guard) => guard.check(context, event),
                None => {
                    tracing::warn!(
                        guard = %name,
                        "no implementation for guard; transition blocked"
                    );
                    false
                }
            },
        }
    }

    /// Run the transition's actions in order, threading the context through
    /// every assign.
    pub(crate) fn run_actions(
        &self,
        transition: &TransitionConfig<S, C, E>,
        context: &Rc<C>,
        event: &E,
    ) -> Rc<C> {
        let mut current = Rc::clone(context);
        for action_ref in &transition.actions {
            let action = match action_ref {
                ActionRef::Inline(action) => action,
                ActionRef::Named(name) => match self.options.find_action(name) {
                    Some(action) => action,
                    None => {
                        tracing::warn!(action = %name, "no implementation for action; skipping");
                        continue;
                    }
                },
            };
            match action {
                Action::Assign(assign) => current = Rc::new(assign(&*current, event)),
                Action::Effect(effect) => effect(&*current, event),
            }
        }
        current
    }
}

impl<S, C, E> MachineDefinition for MachineConfig<S, C, E>
where
    S: State,
    E: Event,
{
    type Machine = StateMachine<S, C, E>;

    fn into_machine(self, initial_context: C) -> StateMachine<S, C, E> {
        StateMachine::new(self, initial_context)
    }
}

impl<S, C, E> Machine for StateMachine<S, C, E>
where
    S: State,
    E: Event,
{
    type Interpreter = MachineInterpreter<S, C, E>;
    type Options = MachineOptions<C, E>;

    fn with_config(mut self, options: MachineOptions<C, E>) -> Self {
        self.options.extend(options);
        self
    }

    fn initial_state(&self) -> Snapshot<S, C> {
        Snapshot {
            value: self.config.initial.clone(),
            context: Rc::clone(&self.context),
        }
    }

    fn interpret(self) -> MachineInterpreter<S, C, E> {
        MachineInterpreter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::state_enum;
    use std::cell::Cell;

    state_enum! {
        enum Light {
            Red,
            Green,
        }
    }

    #[derive(Clone, Debug)]
    enum Signal {
        Go,
        Count(u32),
    }

    impl Event for Signal {
        fn event_type(&self) -> &str {
            match self {
                Self::Go => "GO",
                Self::Count(_) => "COUNT",
            }
        }
    }

    fn config() -> MachineConfig<Light, u32, Signal> {
        MachineBuilder::new()
            .initial(Light::Red)
            .state(Light::Red, |s| {
                s.on("GO", |t| t.target(Light::Green).guard_named("ready"))
                    .on("COUNT", |t| {
                        t.assign(|n: &u32, e: &Signal| match e {
                            Signal::Count(by) => n + by,
                            Signal::Go => *n,
                        })
                        .action("double")
                    })
            })
            .state(Light::Green, |s| s)
            .build()
            .unwrap()
    }

    #[test]
    fn initial_state_shares_context_allocation() {
        let machine = config().into_machine(5);
        let snapshot = machine.initial_state();

        assert_eq!(snapshot.value, Light::Red);
        assert!(Rc::ptr_eq(&snapshot.context, machine.context()));
    }

    #[test]
    fn missing_named_guard_blocks_transition() {
        let machine = config().into_machine(0);
        assert!(machine.select(&Light::Red, &0, &Signal::Go).is_none());

        let machine = machine.with_config(MachineOptions::new().guard("ready", |_, _| true));
        let transition = machine.select(&Light::Red, &0, &Signal::Go).unwrap();
        assert_eq!(transition.target, Some(Light::Green));
    }

    #[test]
    fn actions_thread_context_in_order() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let machine = config().into_machine(1).with_config(MachineOptions::new().action(
            "double",
            Action::assign(move |n: &u32, _: &Signal| {
                counter.set(counter.get() + 1);
                n * 2
            }),
        ));

        let event = Signal::Count(2);
        let transition = machine.select(&Light::Red, &1, &event).unwrap();
        let next = machine.run_actions(transition, machine.context(), &event);

        assert_eq!(*next, 6);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn missing_named_action_is_skipped() {
        let machine = config().into_machine(1);
        let event = Signal::Count(2);
        let transition = machine.select(&Light::Red, &1, &event).unwrap();

        let next = machine.run_actions(transition, machine.context(), &event);

        assert_eq!(*next, 3);
    }

    #[test]
    fn unknown_event_selects_nothing() {
        let machine = config().into_machine(0);
        assert!(machine.select(&Light::Green, &0, &Signal::Go).is_none());
    }
}
