//! State transition history tracking.
//!
//! The reference interpreter records every change of the visible state
//! name here, so a host can inspect the path a machine has taken.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single change of the visible state.
///
/// # Example
///
/// ```rust
/// use statesync::core::{State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Light {
///     Red,
///     Green,
/// }
///
/// impl State for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Red => "RED",
///             Self::Green => "GREEN",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Light::Red,
///     to: Light::Green,
///     event: "GO_GREEN".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to.name(), "GREEN");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Type of the event that caused the transition
    pub event: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Every visible state change an interpreter has made, oldest first.
///
/// [`record`](Self::record) hands back an extended copy and leaves `self`
/// alone. Interpreters that own their history append in place with
/// [`push`](Self::push) and bound it with [`retain_last`](Self::retain_last).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
        }
    }

    /// Append `transition` to a copy of this history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    /// Append `transition` in place.
    pub fn push(&mut self, transition: StateTransition<S>) {
        self.transitions.push_back(transition);
    }

    /// Drop the oldest changes until at most `limit` remain.
    pub fn retain_last(&mut self, limit: usize) {
        while self.transitions.len() > limit {
            self.transitions.pop_front();
        }
    }

    /// States visited: the first `from`, then each `to`.
    /// Empty when nothing has been recorded.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and the most recent change.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.front()?;
        let last = self.transitions.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &VecDeque<StateTransition<S>> {
        &self.transitions
    }

    /// The most recent change, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    /// Event types that caused each change, in order.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.transitions.iter().map(|t| t.event.as_str())
    }
}
