//! Interfaces of the machine and interpreter the adapter drives.
//!
//! The adapter never executes transitions itself. Anything implementing
//! these traits can be mirrored; the crate's own [`machine`](crate::machine)
//! module is one implementation.

use crate::core::State;
use std::rc::Rc;

/// What an interpreter reports after processing an event.
#[derive(Debug)]
pub struct TransitionRecord<S, C> {
    /// Whether processing the event did anything (moved the state or ran actions).
    pub changed: bool,
    /// The resolved state after the event.
    pub value: S,
    /// The context after the event.
    pub context: Rc<C>,
}

impl<S: Clone, C> Clone for TransitionRecord<S, C> {
    fn clone(&self) -> Self {
        Self {
            changed: self.changed,
            value: self.value.clone(),
            context: Rc::clone(&self.context),
        }
    }
}

/// A machine's declared starting point.
#[derive(Debug)]
pub struct Snapshot<S, C> {
    pub value: S,
    pub context: Rc<C>,
}

/// Callback invoked on every transition attempt.
pub type TransitionListener<S, C> = Box<dyn FnMut(&TransitionRecord<S, C>)>;

/// Callback invoked with the context after every processed event.
pub type ContextListener<C> = Box<dyn FnMut(&Rc<C>)>;

/// A running instance of a machine.
pub trait Interpreter {
    type State: State;
    type Context;
    type Event;

    /// Begin processing events.
    fn start(&mut self);

    /// Process one event. Listeners run synchronously before this returns.
    fn send(&mut self, event: Self::Event);

    fn on_transition(&mut self, listener: TransitionListener<Self::State, Self::Context>);

    fn on_change(&mut self, listener: ContextListener<Self::Context>);
}

/// A machine bound to its initial context, ready to be interpreted.
pub trait Machine: Sized {
    type Interpreter: Interpreter;
    /// Implementations supplied at construction time (actions, guards, ...).
    type Options;

    /// Return a copy of this machine with `options` applied.
    fn with_config(self, options: Self::Options) -> Self;

    fn initial_state(&self) -> Snapshot<StateOf<Self>, ContextOf<Self>>;

    fn interpret(self) -> Self::Interpreter;
}

/// A declarative description that becomes a [`Machine`] once given a context.
pub trait MachineDefinition {
    type Machine: Machine;

    fn into_machine(self, initial_context: ContextOf<Self::Machine>) -> Self::Machine;
}

pub type StateOf<M> = <<M as Machine>::Interpreter as Interpreter>::State;
pub type ContextOf<M> = <<M as Machine>::Interpreter as Interpreter>::Context;
pub type EventOf<M> = <<M as Machine>::Interpreter as Interpreter>::Event;
pub type OptionsOf<D> = <<D as MachineDefinition>::Machine as Machine>::Options;
