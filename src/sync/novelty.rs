//! Policies deciding whether an interpreter callback is worth publishing.
//!
//! The listeners consult a policy and only then hand a change to the gate.
//! The gate never compares anything, so swapping the policy never touches
//! how changes are committed.

use crate::core::State;
use crate::sync::interpreter::TransitionRecord;
use crate::sync::observed::ObservedState;
use std::rc::Rc;

pub trait NoveltyPolicy<S, C> {
    /// Called for every transition the interpreter reports.
    fn transition_is_novel(
        &self,
        record: &TransitionRecord<S, C>,
        observed: &ObservedState<S, C>,
    ) -> bool;

    /// Called for every context the interpreter reports.
    fn context_is_novel(&self, context: &Rc<C>, observed: &ObservedState<S, C>) -> bool;
}

/// The default policy.
///
/// A transition is novel when the interpreter flags it as changed *and* the
/// resolved state differs from the mirrored one. Both checks are needed: an
/// internal transition can be `changed` without moving the visible state.
/// A context is novel when it is a different allocation from the mirrored
/// one, regardless of its contents.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityNovelty;

impl<S: State, C> NoveltyPolicy<S, C> for IdentityNovelty {
    fn transition_is_novel(
        &self,
        record: &TransitionRecord<S, C>,
        observed: &ObservedState<S, C>,
    ) -> bool {
        record.changed && record.value != *observed.state()
    }

    fn context_is_novel(&self, context: &Rc<C>, observed: &ObservedState<S, C>) -> bool {
        !Rc::ptr_eq(context, observed.context())
    }
}

/// Like [`IdentityNovelty`] for transitions, but compares contexts by value.
///
/// Reassigning an equal context publishes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueNovelty;

impl<S: State, C: PartialEq> NoveltyPolicy<S, C> for ValueNovelty {
    fn transition_is_novel(
        &self,
        record: &TransitionRecord<S, C>,
        observed: &ObservedState<S, C>,
    ) -> bool {
        IdentityNovelty.transition_is_novel(record, observed)
    }

    fn context_is_novel(&self, context: &Rc<C>, observed: &ObservedState<S, C>) -> bool {
        **context != **observed.context()
    }
}
