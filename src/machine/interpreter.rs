//! Running a [`StateMachine`].

use crate::core::{Event, State, StateHistory, StateTransition};
use crate::machine::definition::StateMachine;
use crate::sync::{ContextListener, Interpreter, TransitionListener, TransitionRecord};
use chrono::Utc;
use std::collections::VecDeque;
use std::rc::Rc;

/// Interpreter lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Events are deferred until `start`.
    NotStarted,
    Running,
    /// A final state was reached; events are ignored.
    Stopped,
}

/// Executes a [`StateMachine`] one event at a time.
///
/// For every processed event, transition listeners run first and context
/// listeners second, both before `send` returns. A record is `changed` when
/// a transition was taken, whether or not it moved the state.
pub struct MachineInterpreter<S: State, C, E> {
    machine: StateMachine<S, C, E>,
    value: S,
    context: Rc<C>,
    status: Status,
    deferred: VecDeque<E>,
    transition_listeners: Vec<TransitionListener<S, C>>,
    change_listeners: Vec<ContextListener<C>>,
    history: StateHistory<S>,
    history_limit: usize,
}

impl<S: State, C, E: Event> MachineInterpreter<S, C, E> {
    pub fn new(machine: StateMachine<S, C, E>) -> Self {
        let value = machine.config().initial().clone();
        let context = Rc::clone(machine.context());
        let history_limit = machine.history_limit();
        Self {
            machine,
            value,
            context,
            status: Status::NotStarted,
            deferred: VecDeque::new(),
            transition_listeners: Vec::new(),
            change_listeners: Vec::new(),
            history: StateHistory::new(),
            history_limit,
        }
    }

    /// Current state (pure)
    pub fn value(&self) -> &S {
        &self.value
    }

    pub fn context(&self) -> &Rc<C> {
        &self.context
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The most recent state changes, bounded by the configured history limit.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    fn process(&mut self, event: E) {
        let (changed, next_value, next_context) =
            match self.machine.select(&self.value, &self.context, &event) {
                Some(transition) => {
                    let context = self.machine.run_actions(transition, &self.context, &event);
                    let value = transition
                        .target
                        .clone()
                        .unwrap_or_else(|| self.value.clone());
                    (true, value, context)
                }
                None => {
                    tracing::trace!(
                        state = self.value.name(),
                        event = event.event_type(),
                        "no transition handles event"
                    );
                    (false, self.value.clone(), Rc::clone(&self.context))
                }
            };

        if next_value != self.value {
            tracing::debug!(
                from = self.value.name(),
                to = next_value.name(),
                event = event.event_type(),
                "state changed"
            );
            self.history.push(StateTransition {
                from: self.value.clone(),
                to: next_value.clone(),
                event: event.event_type().to_string(),
                timestamp: Utc::now(),
            });
            self.history.retain_last(self.history_limit);
        }
        self.value = next_value;
        self.context = next_context;

        let record = TransitionRecord {
            changed,
            value: self.value.clone(),
            context: Rc::clone(&self.context),
        };
        for listener in self.transition_listeners.iter_mut() {
            listener(&record);
        }
        for listener in self.change_listeners.iter_mut() {
            listener(&record.context);
        }

        if self.value.is_final() {
            tracing::debug!(state = self.value.name(), "reached final state; stopping");
            self.status = Status::Stopped;
        }
    }
}

impl<S: State, C, E: Event> Interpreter for MachineInterpreter<S, C, E> {
    type State = S;
    type Context = C;
    type Event = E;

    fn start(&mut self) {
        if self.status != Status::NotStarted {
            tracing::warn!(status = ?self.status, "interpreter already started");
            return;
        }
        self.status = if self.value.is_final() {
            Status::Stopped
        } else {
            Status::Running
        };

        while self.status == Status::Running {
            let Some(event) = self.deferred.pop_front() else {
                break;
            };
            self.process(event);
        }
        self.deferred.clear();
    }

    fn send(&mut self, event: E) {
        match self.status {
            Status::NotStarted => {
                tracing::debug!(
                    event = event.event_type(),
                    "interpreter not started; deferring event"
                );
                self.deferred.push_back(event);
            }
            Status::Running => self.process(event),
            Status::Stopped => {
                tracing::warn!(
                    state = self.value.name(),
                    event = event.event_type(),
                    "interpreter stopped; ignoring event"
                );
            }
        }
    }

    fn on_transition(&mut self, listener: TransitionListener<S, C>) {
        self.transition_listeners.push(listener);
    }

    fn on_change(&mut self, listener: ContextListener<C>) {
        self.change_listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::machine::MachineOptions;
    use crate::state_enum;
    use crate::sync::{Machine, MachineDefinition};
    use std::cell::RefCell;

    state_enum! {
        enum Job {
            Queued,
            Running,
            Done,
        }
        final: [Done]
    }

    #[derive(Clone, Debug, PartialEq)]
    enum JobEvent {
        Run,
        Progress(u32),
        Finish,
    }

    impl Event for JobEvent {
        fn event_type(&self) -> &str {
            match self {
                Self::Run => "RUN",
                Self::Progress(_) => "PROGRESS",
                Self::Finish => "FINISH",
            }
        }
    }

    fn interpreter() -> MachineInterpreter<Job, u32, JobEvent> {
        interpreter_with(MachineOptions::new())
    }

    fn interpreter_with(
        options: MachineOptions<u32, JobEvent>,
    ) -> MachineInterpreter<Job, u32, JobEvent> {
        MachineBuilder::new()
            .initial(Job::Queued)
            .state(Job::Queued, |s| s.on("RUN", |t| t.target(Job::Running)))
            .state(Job::Running, |s| {
                s.on("PROGRESS", |t| {
                    t.assign(|done: &u32, e: &JobEvent| match e {
                        JobEvent::Progress(n) => done + n,
                        _ => *done,
                    })
                })
                .on("RUN", |t| t.target(Job::Running))
                .on("FINISH", |t| t.target(Job::Done))
            })
            .state(Job::Done, |s| s)
            .build()
            .unwrap()
            .into_machine(0)
            .with_config(options)
            .interpret()
    }

    type Log = Rc<RefCell<Vec<(bool, Job, u32)>>>;

    fn record_transitions(interpreter: &mut MachineInterpreter<Job, u32, JobEvent>) -> Log {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        interpreter.on_transition(Box::new(move |record| {
            sink.borrow_mut().push((record.changed, record.value.clone(), *record.context));
        }));
        log
    }

    #[test]
    fn events_before_start_are_deferred() {
        let mut interpreter = interpreter();
        let log = record_transitions(&mut interpreter);

        interpreter.send(JobEvent::Run);
        assert_eq!(interpreter.value(), &Job::Queued);
        assert!(log.borrow().is_empty());

        interpreter.start();

        assert_eq!(interpreter.status(), Status::Running);
        assert_eq!(interpreter.value(), &Job::Running);
        assert_eq!(*log.borrow(), vec![(true, Job::Running, 0)]);
    }

    #[test]
    fn assign_replaces_context_allocation() {
        let mut interpreter = interpreter();
        interpreter.start();
        interpreter.send(JobEvent::Run);
        let before = Rc::clone(interpreter.context());

        interpreter.send(JobEvent::Progress(3));

        assert_eq!(**interpreter.context(), 3);
        assert!(!Rc::ptr_eq(&before, interpreter.context()));
    }

    #[test]
    fn unhandled_event_reports_unchanged() {
        let mut interpreter = interpreter();
        interpreter.start();
        let log = record_transitions(&mut interpreter);
        let before = Rc::clone(interpreter.context());

        interpreter.send(JobEvent::Finish);

        assert_eq!(*log.borrow(), vec![(false, Job::Queued, 0)]);
        assert!(Rc::ptr_eq(&before, interpreter.context()));
    }

    #[test]
    fn self_transition_is_changed_without_moving() {
        let mut interpreter = interpreter();
        interpreter.start();
        interpreter.send(JobEvent::Run);
        let log = record_transitions(&mut interpreter);

        interpreter.send(JobEvent::Run);

        assert_eq!(*log.borrow(), vec![(true, Job::Running, 0)]);
        assert_eq!(interpreter.history().transitions().len(), 1);
    }

    #[test]
    fn context_listeners_run_after_transition_listeners() {
        let mut interpreter = interpreter();
        interpreter.start();
        let order = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&order);
        interpreter.on_change(Box::new(move |_| sink.borrow_mut().push("context")));
        let sink = Rc::clone(&order);
        interpreter.on_transition(Box::new(move |_| sink.borrow_mut().push("transition")));

        interpreter.send(JobEvent::Run);

        assert_eq!(*order.borrow(), vec!["transition", "context"]);
    }

    #[test]
    fn final_state_stops_interpreter() {
        let mut interpreter = interpreter();
        interpreter.start();
        interpreter.send(JobEvent::Run);
        interpreter.send(JobEvent::Finish);
        let log = record_transitions(&mut interpreter);

        interpreter.send(JobEvent::Run);

        assert_eq!(interpreter.status(), Status::Stopped);
        assert_eq!(interpreter.value(), &Job::Done);
        assert!(log.borrow().is_empty());
        let path = interpreter.history().get_path();
        assert_eq!(path, vec![&Job::Queued, &Job::Running, &Job::Done]);
    }

    #[test]
    fn start_twice_is_ignored() {
        let mut interpreter = interpreter();
        interpreter.start();
        interpreter.send(JobEvent::Run);
        interpreter.start();

        assert_eq!(interpreter.value(), &Job::Running);
        assert_eq!(interpreter.status(), Status::Running);
    }

    #[test]
    fn history_keeps_only_the_latest_changes() {
        let mut interpreter = interpreter_with(MachineOptions::new().history_limit(2));
        interpreter.start();

        interpreter.send(JobEvent::Run);
        interpreter.send(JobEvent::Finish);

        assert_eq!(interpreter.history().transitions().len(), 2);

        let mut interpreter = interpreter_with(MachineOptions::new().history_limit(1));
        interpreter.start();
        interpreter.send(JobEvent::Run);
        interpreter.send(JobEvent::Finish);

        assert_eq!(
            interpreter.history().get_path(),
            vec![&Job::Running, &Job::Done]
        );
    }
}
