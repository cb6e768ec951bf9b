//! Named implementations supplied when a machine is configured.

use crate::core::Guard;
use crate::machine::config::Action;
use std::collections::HashMap;
use std::fmt;

/// State changes an interpreter remembers when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Action and guard implementations looked up by name.
///
/// Transitions can refer to actions and guards by name so the same
/// configuration can be reused with different implementations. Applying
/// options to a machine that already has some overrides entries with the
/// same name.
///
/// Options also bound how many state changes the interpreter keeps in its
/// history (see [`history_limit`](Self::history_limit)).
///
/// # Example
///
/// ```rust
/// use statesync::machine::{Action, MachineOptions};
///
/// struct Junction {
///     car_count: u32,
/// }
///
/// let options: MachineOptions<Junction, ()> = MachineOptions::new()
///     .action(
///         "countCar",
///         Action::assign(|ctx: &Junction, _| Junction {
///             car_count: ctx.car_count + 1,
///         }),
///     )
///     .guard("hasTraffic", |ctx: &Junction, _| ctx.car_count > 0);
///
/// assert!(options.has_action("countCar"));
/// assert!(options.has_guard("hasTraffic"));
/// ```
pub struct MachineOptions<C, E> {
    actions: HashMap<String, Action<C, E>>,
    guards: HashMap<String, Guard<C, E>>,
    history_limit: Option<usize>,
}

impl<C, E> MachineOptions<C, E> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            guards: HashMap::new(),
            history_limit: None,
        }
    }

    pub fn action(mut self, name: impl Into<String>, action: Action<C, E>) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    /// Keep at most `limit` state changes in the interpreter's history.
    ///
    /// Older changes are dropped first. Without this the interpreter keeps
    /// the last [`DEFAULT_HISTORY_LIMIT`] changes.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    pub(crate) fn find_action(&self, name: &str) -> Option<&Action<C, E>> {
        self.actions.get(name)
    }

    pub(crate) fn find_guard(&self, name: &str) -> Option<&Guard<C, E>> {
        self.guards.get(name)
    }

    pub(crate) fn resolved_history_limit(&self) -> usize {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    /// Merge `other` into `self`; entries in `other` win.
    pub fn extend(&mut self, other: MachineOptions<C, E>) {
        self.actions.extend(other.actions);
        self.guards.extend(other.guards);
        if other.history_limit.is_some() {
            self.history_limit = other.history_limit;
        }
    }
}

impl<C, E> Default for MachineOptions<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> Clone for MachineOptions<C, E> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            guards: self.guards.clone(),
            history_limit: self.history_limit,
        }
    }
}

impl<C, E> fmt::Debug for MachineOptions<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&String> = self.actions.keys().collect();
        let mut guards: Vec<&String> = self.guards.keys().collect();
        actions.sort();
        guards.sort();
        f.debug_struct("MachineOptions")
            .field("actions", &actions)
            .field("guards", &guards)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}
