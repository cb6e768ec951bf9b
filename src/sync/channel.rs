//! External event channels and the reference [`Subject`] implementation.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// Callback receiving every event a channel emits.
pub type EventHandler<E> = Box<dyn FnMut(E)>;

/// Owned handle to a live subscription.
///
/// `unsubscribe` is idempotent: calls after the first do nothing.
pub trait SubscriptionHandle {
    fn unsubscribe(&mut self);
}

/// A push-based stream of events.
///
/// Handlers only receive events. How a stream reports its own failure is
/// up to the implementation; nothing flows back through the handler.
pub trait Channel<E> {
    fn subscribe(&self, handler: EventHandler<E>) -> Box<dyn SubscriptionHandle>;
}

struct Registration<E> {
    id: u64,
    handler: Rc<RefCell<EventHandler<E>>>,
}

struct SubjectInner<E> {
    handlers: RefCell<Vec<Registration<E>>>,
    next_id: Cell<u64>,
    queue: RefCell<VecDeque<E>>,
    emitting: Cell<bool>,
    completed: Cell<bool>,
}

impl<E> SubjectInner<E> {
    fn is_subscribed(&self, id: u64) -> bool {
        self.handlers.borrow().iter().any(|r| r.id == id)
    }

    fn remove(&self, id: u64) {
        self.handlers.borrow_mut().retain(|r| r.id != id);
    }
}

/// Marks a subject as delivering until dropped, including when a handler
/// unwinds. Events still queued by an unwinding delivery are discarded.
struct EmitGuard<'a, E> {
    inner: &'a SubjectInner<E>,
}

impl<'a, E> EmitGuard<'a, E> {
    fn enter(inner: &'a SubjectInner<E>) -> Self {
        inner.emitting.set(true);
        Self { inner }
    }
}

impl<E> Drop for EmitGuard<'_, E> {
    fn drop(&mut self) {
        self.inner.emitting.set(false);
        if std::thread::panicking() {
            self.inner.queue.borrow_mut().clear();
        }
    }
}

/// Single-threaded multicast channel.
///
/// Every subscriber receives every event emitted after it subscribed, in
/// subscription order. An `emit` issued from inside a handler is queued and
/// delivered after the current event has reached all subscribers.
///
/// Clones share the same subscriber list.
///
/// # Example
///
/// ```rust
/// use statesync::sync::{Channel, Subject};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let subject = Subject::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = Rc::clone(&seen);
/// let mut subscription = subject.subscribe(Box::new(move |n: u32| sink.borrow_mut().push(n)));
///
/// subject.emit(1);
/// subscription.unsubscribe();
/// subject.emit(2);
///
/// assert_eq!(*seen.borrow(), vec![1]);
/// ```
pub struct Subject<E> {
    inner: Rc<SubjectInner<E>>,
}

impl<E: Clone + 'static> Subject<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                handlers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                emitting: Cell::new(false),
                completed: Cell::new(false),
            }),
        }
    }

    /// Deliver `event` to every current subscriber.
    pub fn emit(&self, event: E) {
        if self.inner.completed.get() {
            tracing::trace!("event emitted on a completed subject; dropping it");
            return;
        }

        self.inner.queue.borrow_mut().push_back(event);
        if self.inner.emitting.get() {
            return;
        }

        let _emitting = EmitGuard::enter(&self.inner);
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };

            let targets: Vec<(u64, Rc<RefCell<EventHandler<E>>>)> = self
                .inner
                .handlers
                .borrow()
                .iter()
                .map(|r| (r.id, Rc::clone(&r.handler)))
                .collect();

            for (id, handler) in targets {
                // A previous handler may have unsubscribed this one.
                if self.inner.is_subscribed(id) {
                    (handler.borrow_mut())(event.clone());
                }
            }
        }
    }

    /// Drop every subscriber and ignore all further events.
    pub fn complete(&self) {
        self.inner.completed.set(true);
        self.inner.handlers.borrow_mut().clear();
        self.inner.queue.borrow_mut().clear();
    }

    pub fn is_completed(&self) -> bool {
        self.inner.completed.get()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

impl<E: Clone + 'static> Default for Subject<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Subject<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Clone + 'static> Channel<E> for Subject<E> {
    fn subscribe(&self, handler: EventHandler<E>) -> Box<dyn SubscriptionHandle> {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        if !self.inner.completed.get() {
            self.inner.handlers.borrow_mut().push(Registration {
                id,
                handler: Rc::new(RefCell::new(handler)),
            });
        }

        Box::new(SubjectSubscription {
            id,
            subject: Rc::downgrade(&self.inner),
            active: true,
        })
    }
}

struct SubjectSubscription<E> {
    id: u64,
    subject: Weak<SubjectInner<E>>,
    active: bool,
}

impl<E> SubscriptionHandle for SubjectSubscription<E> {
    fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(subject) = self.subject.upgrade() {
            subject.remove(self.id);
        }
    }
}
