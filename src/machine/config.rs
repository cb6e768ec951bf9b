//! Declarative machine configuration.

use crate::core::{Event, Guard, State};
use std::fmt;
use std::rc::Rc;

/// Something a transition does when it is taken.
pub enum Action<C, E> {
    /// Produce a new context from the current one and the event.
    Assign(Rc<dyn Fn(&C, &E) -> C>),
    /// Observe the context and event without changing either.
    Effect(Rc<dyn Fn(&C, &E)>),
}

impl<C, E> Action<C, E> {
    pub fn assign<F>(f: F) -> Self
    where
        F: Fn(&C, &E) -> C + 'static,
    {
        Action::Assign(Rc::new(f))
    }

    pub fn effect<F>(f: F) -> Self
    where
        F: Fn(&C, &E) + 'static,
    {
        Action::Effect(Rc::new(f))
    }
}

impl<C, E> Clone for Action<C, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Assign(f) => Self::Assign(Rc::clone(f)),
            Self::Effect(f) => Self::Effect(Rc::clone(f)),
        }
    }
}

impl<C, E> fmt::Debug for Action<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign(_) => f.write_str("Assign(..)"),
            Self::Effect(_) => f.write_str("Effect(..)"),
        }
    }
}

/// An action given inline or by a name resolved through
/// [`MachineOptions`](super::MachineOptions).
#[derive(Debug)]
pub enum ActionRef<C, E> {
    Inline(Action<C, E>),
    Named(String),
}

impl<C, E> Clone for ActionRef<C, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Inline(action) => Self::Inline(action.clone()),
            Self::Named(name) => Self::Named(name.clone()),
        }
    }
}

/// A guard given inline or by name.
#[derive(Debug)]
pub enum GuardRef<C, E> {
    Inline(Guard<C, E>),
    Named(String),
}

impl<C, E> Clone for GuardRef<C, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Inline(guard) => Self::Inline(guard.clone()),
            Self::Named(name) => Self::Named(name.clone()),
        }
    }
}

/// One candidate transition for an event.
///
/// Without a target the transition stays in the current state and only
/// runs its actions.
#[derive(Debug)]
pub struct TransitionConfig<S, C, E> {
    pub target: Option<S>,
    pub guard: Option<GuardRef<C, E>>,
    pub actions: Vec<ActionRef<C, E>>,
}

impl<S: Clone, C, E> Clone for TransitionConfig<S, C, E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            guard: self.guard.clone(),
            actions: self.actions.clone(),
        }
    }
}

/// A declared state and the transitions it handles, keyed by event type.
#[derive(Debug)]
pub struct StateNode<S, C, E> {
    pub state: S,
    pub on: Vec<(String, Vec<TransitionConfig<S, C, E>>)>,
}

impl<S: State, C, E> StateNode<S, C, E> {
    /// Candidate transitions for `event_type`, in declaration order.
    pub fn candidates(&self, event_type: &str) -> &[TransitionConfig<S, C, E>] {
        self.on
            .iter()
            .find(|(ty, _)| ty == event_type)
            .map(|(_, transitions)| transitions.as_slice())
            .unwrap_or(&[])
    }
}

/// A validated machine description, built with
/// [`MachineBuilder`](crate::builder::MachineBuilder).
///
/// Cloning is cheap; clones share the state table.
pub struct MachineConfig<S, C, E> {
    pub(crate) initial: S,
    pub(crate) states: Rc<Vec<StateNode<S, C, E>>>,
}

impl<S: State, C, E: Event> MachineConfig<S, C, E> {
    pub fn initial(&self) -> &S {
        &self.initial
    }

    pub fn node(&self, state: &S) -> Option<&StateNode<S, C, E>> {
        self.states.iter().find(|node| node.state == *state)
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.states.iter().map(|node| &node.state)
    }
}

impl<S: Clone, C, E> Clone for MachineConfig<S, C, E> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            states: Rc::clone(&self.states),
        }
    }
}

impl<S: fmt::Debug, C, E> fmt::Debug for MachineConfig<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineConfig")
            .field("initial", &self.initial)
            .field("states", &self.states.len())
            .finish()
    }
}
