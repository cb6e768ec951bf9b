//! The mirrored `(state, context, token)` triple.

use crate::core::State;
use crate::sync::token::ChangeToken;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Snapshot of what the adapter currently mirrors.
///
/// The three fields are always written together by a single commit, and
/// readers receive the triple as one cloned value, so a token is never paired
/// with a state or context it was not stamped for.
#[derive(Serialize)]
#[serde(bound(serialize = "S: State, C: Serialize"))]
pub struct ObservedState<S, C> {
    state: S,
    context: Rc<C>,
    token: ChangeToken,
}

impl<S: State, C> ObservedState<S, C> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn context(&self) -> &Rc<C> {
        &self.context
    }

    pub fn token(&self) -> &ChangeToken {
        &self.token
    }

    /// Apply a partial change on top of `previous`.
    ///
    /// Fields missing from `change` keep their previous values. Returns
    /// `None` when there is no previous value to fill a missing field from.
    pub(crate) fn merged(previous: Option<&Self>, change: Change<S, C>) -> Option<Self> {
        let Change {
            state,
            context,
            token,
        } = change;

        let state = match state {
            Some(state) => state,
            None => previous?.state.clone(),
        };
        let context = match context {
            Some(context) => context,
            None => Rc::clone(&previous?.context),
        };

        Some(Self {
            state,
            context,
            token,
        })
    }
}

impl<S: Clone, C> Clone for ObservedState<S, C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            context: Rc::clone(&self.context),
            token: self.token.clone(),
        }
    }
}

impl<S: fmt::Debug, C: fmt::Debug> fmt::Debug for ObservedState<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedState")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("token", &self.token)
            .finish()
    }
}

/// A partial update handed to the change gate.
///
/// Only the token is mandatory; it is generated by whoever decided the
/// change is worth publishing.
pub struct Change<S, C> {
    pub state: Option<S>,
    pub context: Option<Rc<C>>,
    pub token: ChangeToken,
}

impl<S, C> Change<S, C> {
    /// A change replacing every field. Used for the initial snapshot.
    pub fn full(state: S, context: Rc<C>, token: ChangeToken) -> Self {
        Self {
            state: Some(state),
            context: Some(context),
            token,
        }
    }

    /// A change touching only the context.
    pub fn context(context: Rc<C>, token: ChangeToken) -> Self {
        Self {
            state: None,
            context: Some(context),
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

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

    #[derive(Debug, PartialEq, Serialize)]
    struct Junction {
        car_count: u32,
    }

    fn token(s: &str) -> ChangeToken {
        ChangeToken::new(s)
    }

    #[test]
    fn full_change_needs_no_previous() {
        let ctx = Rc::new(Junction { car_count: 0 });
        let observed =
            ObservedState::merged(None, Change::full(Light::Red, Rc::clone(&ctx), token("a")))
                .unwrap();

        assert_eq!(observed.state(), &Light::Red);
        assert!(Rc::ptr_eq(observed.context(), &ctx));
        assert_eq!(observed.token(), &token("a"));
    }

    #[test]
    fn partial_change_without_previous_is_rejected() {
        let ctx = Rc::new(Junction { car_count: 0 });
        let merged = ObservedState::<Light, _>::merged(None, Change::context(ctx, token("a")));
        assert!(merged.is_none());
    }

    #[test]
    fn omitted_fields_keep_previous_values() {
        let first_ctx = Rc::new(Junction { car_count: 0 });
        let previous =
            ObservedState::merged(None, Change::full(Light::Red, first_ctx, token("a"))).unwrap();

        let next_ctx = Rc::new(Junction { car_count: 1 });
        let next = ObservedState::merged(
            Some(&previous),
            Change::context(Rc::clone(&next_ctx), token("b")),
        )
        .unwrap();

        assert_eq!(next.state(), &Light::Red);
        assert!(Rc::ptr_eq(next.context(), &next_ctx));
        assert_eq!(next.token(), &token("b"));

        let moved = ObservedState::merged(
            Some(&next),
            Change {
                state: Some(Light::Green),
                context: None,
                token: token("c"),
            },
        )
        .unwrap();

        assert_eq!(moved.state(), &Light::Green);
        assert!(Rc::ptr_eq(moved.context(), &next_ctx));
    }

    #[test]
    fn snapshot_serializes_all_fields() {
        let observed = ObservedState::merged(
            None,
            Change::full(Light::Green, Rc::new(Junction { car_count: 3 }), token("t")),
        )
        .unwrap();

        let json = serde_json::to_value(&observed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "state": "Green",
                "context": { "car_count": 3 },
                "token": "t",
            })
        );
    }
}
