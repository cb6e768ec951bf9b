//! Builder for constructing transitions.

use crate::core::Guard;
use crate::machine::{Action, ActionRef, GuardRef, TransitionConfig};

/// Builder for constructing transitions with a fluent API.
///
/// Every part is optional: a transition with no target stays in its state,
/// one with no guard is always taken, one with no actions leaves the
/// context alone.
pub struct TransitionBuilder<S, C, E> {
    target: Option<S>,
    guard: Option<GuardRef<C, E>>,
    actions: Vec<ActionRef<C, E>>,
}

impl<S, C, E> TransitionBuilder<S, C, E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            target: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Set the target state.
    pub fn target(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    /// Add a guard predicate.
    pub fn guard(mut self, guard: Guard<C, E>) -> Self {
        self.guard = Some(GuardRef::Inline(guard));
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + 'static,
    {
        self.guard = Some(GuardRef::Inline(Guard::new(predicate)));
        self
    }

    /// Use the guard registered under `name` in the machine options.
    pub fn guard_named(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(GuardRef::Named(name.into()));
        self
    }

    /// Append an action that replaces the context.
    pub fn assign<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, &E) -> C + 'static,
    {
        self.actions.push(ActionRef::Inline(Action::assign(f)));
        self
    }

    /// Append an action that only observes the context.
    pub fn effect<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, &E) + 'static,
    {
        self.actions.push(ActionRef::Inline(Action::effect(f)));
        self
    }

    /// Append the action registered under `name` in the machine options.
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.actions.push(ActionRef::Named(name.into()));
        self
    }

    /// Build the transition.
    pub fn build(self) -> TransitionConfig<S, C, E> {
        TransitionConfig {
            target: self.target,
            guard: self.guard,
            actions: self.actions,
        }
    }
}

impl<S, C, E> Default for TransitionBuilder<S, C, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_is_a_plain_transition() {
        let transition = TransitionBuilder::<u8, u32, ()>::new().build();

        assert!(transition.target.is_none());
        assert!(transition.guard.is_none());
        assert!(transition.actions.is_empty());
    }

    #[test]
    fn actions_keep_declaration_order() {
        let transition = TransitionBuilder::<u8, u32, ()>::new()
            .target(2)
            .action("first")
            .assign(|n: &u32, _: &()| n + 1)
            .action("last")
            .build();

        assert_eq!(transition.target, Some(2));
        assert_eq!(transition.actions.len(), 3);
        assert!(matches!(&transition.actions[0], ActionRef::Named(name) if name == "first"));
        assert!(matches!(&transition.actions[1], ActionRef::Inline(Action::Assign(_))));
        assert!(matches!(&transition.actions[2], ActionRef::Named(name) if name == "last"));
    }

    #[test]
    fn later_guard_replaces_earlier() {
        let transition = TransitionBuilder::<u8, u32, ()>::new()
            .when(|n: &u32, _: &()| *n > 0)
            .guard_named("ready")
            .build();

        assert!(matches!(transition.guard, Some(GuardRef::Named(ref name)) if name == "ready"));
    }

    #[test]
    fn inline_guard_is_evaluated() {
        let transition = TransitionBuilder::<u8, u32, ()>::new()
            .when(|n: &u32, _: &()| *n > 0)
            .build();

        match transition.guard {
            Some(GuardRef::Inline(guard)) => {
                assert!(guard.check(&1, &()));
                assert!(!guard.check(&0, &()));
            }
            other => panic!("Expected inline guard, got {other:?}"),
        }
    }
}
