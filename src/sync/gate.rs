//! Single commit point for mirrored state.

use crate::core::State;
use crate::sync::channel::{Channel, EventHandler, SubscriptionHandle, Subject};
use crate::sync::observed::{Change, ObservedState};
use std::cell::RefCell;

/// Commits changes into the mirrored [`ObservedState`] and publishes them.
///
/// The gate trusts its callers: it is only invoked for changes that were
/// already judged novel, so it merges, stamps the token and notifies
/// observers without comparing anything.
pub(crate) struct ChangeGate<S, C> {
    observed: RefCell<Option<ObservedState<S, C>>>,
    changes: Subject<ObservedState<S, C>>,
}

impl<S: State + 'static, C: 'static> ChangeGate<S, C> {
    pub(crate) fn new() -> Self {
        Self {
            observed: RefCell::new(None),
            changes: Subject::new(),
        }
    }

    pub(crate) fn commit(&self, change: Change<S, C>) {
        let committed = {
            let mut slot = self.observed.borrow_mut();
            let Some(next) = ObservedState::merged(slot.as_ref(), change) else {
                tracing::error!(
                    "partial change arrived before any state was observed; dropping it"
                );
                return;
            };
            *slot = Some(next.clone());
            next
        };

        tracing::debug!(
            state = committed.state().name(),
            token = %committed.token(),
            "committed change"
        );
        self.changes.emit(committed);
    }

    pub(crate) fn current(&self) -> Option<ObservedState<S, C>> {
        self.observed.borrow().clone()
    }

    /// Run `f` against the mirrored state without cloning it.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&ObservedState<S, C>) -> R) -> Option<R> {
        self.observed.borrow().as_ref().map(f)
    }

    pub(crate) fn subscribe(
        &self,
        observer: EventHandler<ObservedState<S, C>>,
    ) -> Box<dyn SubscriptionHandle> {
        self.changes.subscribe(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::token::ChangeToken;
    use serde::{Deserialize, Serialize};
    use std::rc::Rc;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Light {
        Red,
        Green,
    }

    impl State for Light {
        fn name(&self) -> &str {
            match self {
                Self::Red => "RED",
                Self::Green => "GREEN",
            }
        }
    }

    #[test]
    fn commit_stamps_token_unconditionally() {
        let gate = ChangeGate::new();
        let ctx = Rc::new(0u32);

        gate.commit(Change::full(Light::Red, Rc::clone(&ctx), ChangeToken::new("a")));
        // Same state and context: the gate still commits.
        gate.commit(Change::full(Light::Red, Rc::clone(&ctx), ChangeToken::new("b")));

        let current = gate.current().unwrap();
        assert_eq!(current.token(), &ChangeToken::new("b"));
        assert_eq!(current.state(), &Light::Red);
    }

    #[test]
    fn partial_commit_before_initial_is_dropped() {
        let gate: ChangeGate<Light, u32> = ChangeGate::new();

        gate.commit(Change::context(Rc::new(1), ChangeToken::new("a")));

        assert!(gate.current().is_none());
    }

    #[test]
    fn observers_receive_each_commit() {
        let gate = ChangeGate::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = gate.subscribe(Box::new(move |observed: ObservedState<Light, u32>| {
            sink.borrow_mut().push(observed.token().clone());
        }));

        gate.commit(Change::full(Light::Red, Rc::new(0), ChangeToken::new("a")));
        gate.commit(Change {
            state: Some(Light::Green),
            context: None,
            token: ChangeToken::new("b"),
        });

        assert_eq!(
            *seen.borrow(),
            vec![ChangeToken::new("a"), ChangeToken::new("b")]
        );
        assert_eq!(gate.read(|o| o.state().clone()), Some(Light::Green));
    }

    #[test]
    fn observers_can_read_during_notification() {
        let gate = Rc::new(ChangeGate::new());
        let reader = Rc::clone(&gate);
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let _subscription = gate.subscribe(Box::new(move |_: ObservedState<Light, u32>| {
            *sink.borrow_mut() = reader.read(|o| o.state().clone());
        }));

        gate.commit(Change::full(Light::Green, Rc::new(0), ChangeToken::new("a")));

        assert_eq!(*seen.borrow(), Some(Light::Green));
    }
}
