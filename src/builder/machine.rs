//! Builder for constructing machine configurations.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, State};
use crate::machine::{MachineConfig, StateNode, TransitionConfig};
use std::rc::Rc;

/// Builder for one state's transitions.
pub struct StateBuilder<S, C, E> {
    state: S,
    on: Vec<(String, Vec<TransitionConfig<S, C, E>>)>,
}

impl<S, C, E> StateBuilder<S, C, E> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            on: Vec::new(),
        }
    }

    /// Add a transition for `event_type`.
    ///
    /// Several transitions for the same event are tried in the order they
    /// were added; the first whose guard passes is taken.
    pub fn on<F>(mut self, event_type: impl Into<String>, configure: F) -> Self
    where
        F: FnOnce(TransitionBuilder<S, C, E>) -> TransitionBuilder<S, C, E>,
    {
        let event_type = event_type.into();
        let transition = configure(TransitionBuilder::new()).build();

        match self.on.iter_mut().find(|(ty, _)| *ty == event_type) {
            Some((_, transitions)) => transitions.push(transition),
            None => self.on.push((event_type, vec![transition])),
        }
        self
    }

    pub fn build(self) -> StateNode<S, C, E> {
        StateNode {
            state: self.state,
            on: self.on,
        }
    }
}

/// Builder for constructing machine configurations with a fluent API.
pub struct MachineBuilder<S, C, E> {
    initial: Option<S>,
    states: Vec<StateNode<S, C, E>>,
}

impl<S: State, C, E: Event> MachineBuilder<S, C, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Declare a state and its transitions.
    pub fn state<F>(mut self, state: S, configure: F) -> Self
    where
        F: FnOnce(StateBuilder<S, C, E>) -> StateBuilder<S, C, E>,
    {
        self.states.push(configure(StateBuilder::new(state)).build());
        self
    }

    /// Build the configuration.
    /// Returns an error if the initial state or any target is undeclared.
    pub fn build(self) -> Result<MachineConfig<S, C, E>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        for (i, node) in self.states.iter().enumerate() {
            if self.states[..i].iter().any(|earlier| earlier.state == node.state) {
                return Err(BuildError::DuplicateState {
                    state: node.state.name().to_string(),
                });
            }
        }

        let declared = |state: &S| self.states.iter().any(|node| node.state == *state);

        if !declared(&initial) {
            return Err(BuildError::UnknownInitialState {
                state: initial.name().to_string(),
            });
        }

        for node in &self.states {
            for (event, transitions) in &node.on {
                let undeclared = transitions
                    .iter()
                    .filter_map(|t| t.target.as_ref())
                    .find(|target| !declared(target));
                if let Some(target) = undeclared {
                    return Err(BuildError::UnknownTarget {
                        from: node.state.name().to_string(),
                        event: event.clone(),
                        target: target.name().to_string(),
                    });
                }
            }
        }

        Ok(MachineConfig {
            initial,
            states: Rc::new(self.states),
        })
    }
}

impl<S: State, C, E: Event> Default for MachineBuilder<S, C, E> {
    fn default() -> Self {
        Self::new()
    }
}
