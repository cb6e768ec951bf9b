//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the machine's context and the
//! incoming event. A transition whose guard rejects is skipped.

use std::fmt;
use std::rc::Rc;

/// Pure predicate that determines if a transition can execute.
///
/// Guards are evaluated against the context *before* any of the
/// transition's actions run.
///
/// # Example
///
/// ```rust
/// use statesync::core::Guard;
///
/// struct Junction {
///     car_count: u32,
/// }
///
/// // Only let the light change once at least one car is waiting.
/// let has_traffic = Guard::new(|ctx: &Junction, _event: &()| ctx.car_count > 0);
///
/// assert!(has_traffic.check(&Junction { car_count: 2 }, &()));
/// assert!(!has_traffic.check(&Junction { car_count: 0 }, &()));
/// ```
pub struct Guard<C, E> {
    predicate: Rc<dyn Fn(&C, &E) -> bool>,
}

impl<C, E> Guard<C, E> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Check if the guard allows the transition for this context and event.
    pub fn check(&self, context: &C, event: &E) -> bool {
        (self.predicate)(context, event)
    }
}

impl<C, E> Clone for Guard<C, E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<C, E> fmt::Debug for Guard<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Counter {
        value: i32,
    }

    #[derive(Debug)]
    enum Step {
        Up(i32),
        Down(i32),
    }

    #[test]
    fn guard_reads_context() {
        let guard = Guard::new(|c: &Counter, _e: &Step| c.value > 0);

        assert!(guard.check(&Counter { value: 1 }, &Step::Up(1)));
        assert!(!guard.check(&Counter { value: 0 }, &Step::Up(1)));
    }

    #[test]
    fn guard_reads_event_payload() {
        let guard = Guard::new(|c: &Counter, e: &Step| match e {
            Step::Up(_) => true,
            Step::Down(n) => c.value - n >= 0,
        });

        let ctx = Counter { value: 3 };
        assert!(guard.check(&ctx, &Step::Up(10)));
        assert!(guard.check(&ctx, &Step::Down(3)));
        assert!(!guard.check(&ctx, &Step::Down(4)));
    }

    #[test]
    fn guard_is_deterministic() {
        let ctx = Counter { value: 5 };
        let guard = Guard::new(|c: &Counter, _e: &Step| c.value % 2 == 1);

        let result1 = guard.check(&ctx, &Step::Up(0));
        let result2 = guard.check(&ctx, &Step::Up(0));

        assert_eq!(result1, result2);
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::new(|c: &Counter, _e: &Step| c.value == 42);
        let cloned = guard.clone();

        assert!(cloned.check(&Counter { value: 42 }, &Step::Up(0)));
        assert!(!cloned.check(&Counter { value: 41 }, &Step::Up(0)));
    }
}
