//! Interpreter lifecycle and the public adapter type.

use crate::core::State;
use crate::sync::channel::{Channel, SubscriptionHandle};
use crate::sync::error::SyncError;
use crate::sync::gate::ChangeGate;
use crate::sync::interpreter::{
    ContextOf, Interpreter, Machine, MachineDefinition, OptionsOf, Snapshot, TransitionRecord,
};
use crate::sync::novelty::{IdentityNovelty, NoveltyPolicy};
use crate::sync::observed::{Change, ObservedState};
use crate::sync::token::{ChangeToken, TokenGenerator, UuidTokens};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

const DEFAULT_NAME: &str = "state-sync";

/// Lifecycle of a [`StateSync`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No interpreter yet. Dispatched events are dropped with a warning.
    Uninitialized,
    /// Building the interpreter. Dispatched events are held until it runs.
    Initializing,
    /// Interpreter started and listeners registered.
    Running,
}

struct Shared<I: Interpreter> {
    name: String,
    phase: Cell<Phase>,
    interpreter: RefCell<Option<I>>,
    pending: RefCell<VecDeque<I::Event>>,
    gate: Rc<ChangeGate<I::State, I::Context>>,
    tokens: Rc<dyn TokenGenerator>,
    policy: Rc<dyn NoveltyPolicy<I::State, I::Context>>,
    subscription: RefCell<Option<Box<dyn SubscriptionHandle>>>,
}

impl<I> Shared<I>
where
    I: Interpreter + 'static,
    I::State: 'static,
    I::Context: 'static,
    I::Event: 'static,
{
    fn dispatch(&self, event: I::Event) {
        match self.phase.get() {
            Phase::Uninitialized => {
                tracing::warn!(
                    adapter = %self.name,
                    "the machine was not initialized; call initialize() before dispatching events"
                );
            }
            Phase::Initializing => {
                tracing::trace!(adapter = %self.name, "holding event until the interpreter runs");
                self.pending.borrow_mut().push_back(event);
            }
            Phase::Running => {
                self.pending.borrow_mut().push_back(event);
                self.drain();
            }
        }
    }

    /// Forward queued events to the interpreter.
    ///
    /// When the interpreter is already busy (an observer or channel handler
    /// dispatched from inside `send`), the events stay queued and the outer
    /// call delivers them once the current event has run to completion.
    fn drain(&self) {
        let Ok(mut slot) = self.interpreter.try_borrow_mut() else {
            tracing::trace!(adapter = %self.name, "interpreter busy; event queued");
            return;
        };
        let Some(interpreter) = slot.as_mut() else {
            return;
        };

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            interpreter.send(event);
        }
    }
}

/// Keeps a state name, a context and a change token mirrored to a live
/// interpreter.
///
/// The adapter owns the interpreter. Every transition and context change the
/// interpreter reports is filtered by a [`NoveltyPolicy`]; accepted changes
/// are committed together with a fresh [`ChangeToken`] and published to
/// observers registered through [`StateSync::subscribe`].
///
/// # Example
///
/// ```rust
/// use statesync::builder::MachineBuilder;
/// use statesync::core::Event;
/// use statesync::machine::{MachineInterpreter, MachineOptions};
/// use statesync::state_enum;
/// use statesync::sync::StateSync;
///
/// state_enum! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// #[derive(Clone, Debug)]
/// struct Toggle;
///
/// impl Event for Toggle {
///     fn event_type(&self) -> &str {
///         "TOGGLE"
///     }
/// }
///
/// let config = MachineBuilder::<Door, u32, Toggle>::new()
///     .initial(Door::Closed)
///     .state(Door::Closed, |s| s.on("TOGGLE", |t| t.target(Door::Open)))
///     .state(Door::Open, |s| s.on("TOGGLE", |t| t.target(Door::Closed)))
///     .build()
///     .unwrap();
///
/// let sync: StateSync<MachineInterpreter<Door, u32, Toggle>> =
///     StateSync::start(0, config, MachineOptions::new()).unwrap();
/// let before = sync.token().unwrap();
///
/// sync.dispatch(Toggle);
///
/// assert_eq!(sync.state(), Some(Door::Open));
/// assert_ne!(sync.token().unwrap(), before);
/// ```
pub struct StateSync<I: Interpreter> {
    shared: Rc<Shared<I>>,
}

impl<I> StateSync<I>
where
    I: Interpreter + 'static,
    I::State: 'static,
    I::Context: 'static,
    I::Event: 'static,
{
    /// Create an uninitialized adapter with the default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> StateSyncBuilder<I> {
        StateSyncBuilder::new()
    }

    /// Create an adapter and initialize it in one step.
    pub fn start<D>(
        initial_context: I::Context,
        definition: D,
        options: OptionsOf<D>,
    ) -> Result<Self, SyncError>
    where
        D: MachineDefinition,
        D::Machine: Machine<Interpreter = I>,
    {
        let sync = Self::new();
        sync.initialize(initial_context, definition, options)?;
        Ok(sync)
    }

    /// Build, start and mirror the interpreter for `definition`.
    ///
    /// The machine's initial state and context are committed as the first
    /// change before the interpreter starts. Fails if the adapter has
    /// already been initialized.
    pub fn initialize<D>(
        &self,
        initial_context: ContextOf<D::Machine>,
        definition: D,
        options: OptionsOf<D>,
    ) -> Result<(), SyncError>
    where
        D: MachineDefinition,
        D::Machine: Machine<Interpreter = I>,
    {
        self.setup(initial_context, definition, options, None)
    }

    /// Like [`initialize`](Self::initialize), then forward every event
    /// `channel` emits to [`dispatch`](Self::dispatch).
    ///
    /// The channel is only borrowed for the subscription; the adapter keeps
    /// the subscription handle and releases it in [`teardown`](Self::teardown).
    pub fn initialize_with_channel<D, Ch>(
        &self,
        initial_context: ContextOf<D::Machine>,
        definition: D,
        options: OptionsOf<D>,
        channel: &Ch,
    ) -> Result<(), SyncError>
    where
        D: MachineDefinition,
        D::Machine: Machine<Interpreter = I>,
        Ch: Channel<I::Event>,
    {
        self.setup(initial_context, definition, options, Some(channel))
    }

    fn setup<D>(
        &self,
        initial_context: ContextOf<D::Machine>,
        definition: D,
        options: OptionsOf<D>,
        channel: Option<&dyn Channel<I::Event>>,
    ) -> Result<(), SyncError>
    where
        D: MachineDefinition,
        D::Machine: Machine<Interpreter = I>,
    {
        let shared = &self.shared;
        if shared.phase.get() != Phase::Uninitialized {
            tracing::error!(adapter = %shared.name, "initialize called twice");
            return Err(SyncError::AlreadyInitialized {
                name: shared.name.clone(),
            });
        }
        shared.phase.set(Phase::Initializing);

        let machine = definition.into_machine(initial_context).with_config(options);
        let Snapshot { value, context } = machine.initial_state();
        let mut interpreter = machine.interpret();

        tracing::debug!(adapter = %shared.name, initial = value.name(), "publishing initial state");
        shared
            .gate
            .commit(Change::full(value, context, shared.tokens.generate()));

        interpreter.start();
        self.register_listeners(&mut interpreter);
        *shared.interpreter.borrow_mut() = Some(interpreter);

        if let Some(channel) = channel {
            self.bridge(channel);
        }

        shared.phase.set(Phase::Running);
        shared.drain();
        Ok(())
    }

    fn register_listeners(&self, interpreter: &mut I) {
        let gate = Rc::clone(&self.shared.gate);
        let tokens = Rc::clone(&self.shared.tokens);
        let policy = Rc::clone(&self.shared.policy);
        interpreter.on_transition(Box::new(
            move |record: &TransitionRecord<I::State, I::Context>| {
                let novel = gate
                    .read(|observed| policy.transition_is_novel(record, observed))
                    .unwrap_or(true);
                if novel {
                    gate.commit(Change {
                        state: Some(record.value.clone()),
                        context: Some(Rc::clone(&record.context)),
                        token: tokens.generate(),
                    });
                }
            },
        ));

        let gate = Rc::clone(&self.shared.gate);
        let tokens = Rc::clone(&self.shared.tokens);
        let policy = Rc::clone(&self.shared.policy);
        interpreter.on_change(Box::new(move |context: &Rc<I::Context>| {
            let novel = gate
                .read(|observed| policy.context_is_novel(context, observed))
                .unwrap_or(true);
            if novel {
                gate.commit(Change::context(Rc::clone(context), tokens.generate()));
            }
        }));
    }

    fn bridge(&self, channel: &dyn Channel<I::Event>) {
        let weak = Rc::downgrade(&self.shared);
        let handle = channel.subscribe(Box::new(move |event| match weak.upgrade() {
            Some(shared) => shared.dispatch(event),
            None => tracing::trace!("adapter dropped; ignoring channel event"),
        }));
        tracing::debug!(adapter = %self.shared.name, "subscribed to channel");
        *self.shared.subscription.borrow_mut() = Some(handle);
    }

    /// Send `event` to the interpreter.
    ///
    /// Before initialization this logs a warning and drops the event.
    pub fn dispatch(&self, event: I::Event) {
        self.shared.dispatch(event);
    }

    /// Release the channel subscription, if any. Safe to call repeatedly.
    ///
    /// The interpreter itself is left as is; it is dropped with the adapter.
    pub fn teardown(&self) {
        let handle = self.shared.subscription.borrow_mut().take();
        if let Some(mut handle) = handle {
            handle.unsubscribe();
            tracing::debug!(adapter = %self.shared.name, "released channel subscription");
        }
    }

    /// Register `observer` to receive every committed change.
    pub fn subscribe<F>(&self, observer: F) -> Box<dyn SubscriptionHandle>
    where
        F: FnMut(ObservedState<I::State, I::Context>) + 'static,
    {
        self.shared.gate.subscribe(Box::new(observer))
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn phase(&self) -> Phase {
        self.shared.phase.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.phase() != Phase::Uninitialized
    }

    /// The mirrored triple, or `None` before initialization.
    pub fn snapshot(&self) -> Option<ObservedState<I::State, I::Context>> {
        self.shared.gate.current()
    }

    pub fn state(&self) -> Option<I::State> {
        self.shared.gate.read(|o| o.state().clone())
    }

    pub fn context(&self) -> Option<Rc<I::Context>> {
        self.shared.gate.read(|o| Rc::clone(o.context()))
    }

    pub fn token(&self) -> Option<ChangeToken> {
        self.shared.gate.read(|o| o.token().clone())
    }

    /// Inspect the interpreter.
    ///
    /// Returns `None` before initialization or while the interpreter is
    /// processing an event.
    pub fn with_interpreter<R>(&self, f: impl FnOnce(&I) -> R) -> Option<R> {
        let slot = self.shared.interpreter.try_borrow().ok()?;
        slot.as_ref().map(f)
    }
}

impl<I> Default for StateSync<I>
where
    I: Interpreter + 'static,
    I::State: 'static,
    I::Context: 'static,
    I::Event: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Interpreter> Drop for StateSync<I> {
    fn drop(&mut self) {
        let handle = self.shared.subscription.borrow_mut().take();
        if let Some(mut handle) = handle {
            handle.unsubscribe();
        }
    }
}

/// Builder for configuring a [`StateSync`] before initialization.
pub struct StateSyncBuilder<I: Interpreter> {
    name: Option<String>,
    tokens: Option<Rc<dyn TokenGenerator>>,
    policy: Option<Rc<dyn NoveltyPolicy<I::State, I::Context>>>,
}

impl<I> StateSyncBuilder<I>
where
    I: Interpreter + 'static,
    I::State: 'static,
    I::Context: 'static,
    I::Event: 'static,
{
    pub fn new() -> Self {
        Self {
            name: None,
            tokens: None,
            policy: None,
        }
    }

    /// Name used in diagnostics (defaults to `"state-sync"`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the default UUID token generator.
    pub fn token_generator<G: TokenGenerator + 'static>(mut self, tokens: G) -> Self {
        self.tokens = Some(Rc::new(tokens));
        self
    }

    /// Replace the default [`IdentityNovelty`] policy.
    pub fn novelty<P>(mut self, policy: P) -> Self
    where
        P: NoveltyPolicy<I::State, I::Context> + 'static,
    {
        self.policy = Some(Rc::new(policy));
        self
    }

    pub fn build(self) -> StateSync<I> {
        let tokens = self.tokens.unwrap_or_else(|| Rc::new(UuidTokens));
        let policy = self.policy.unwrap_or_else(|| Rc::new(IdentityNovelty));

        StateSync {
            shared: Rc::new(Shared {
                name: self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
                phase: Cell::new(Phase::Uninitialized),
                interpreter: RefCell::new(None),
                pending: RefCell::new(VecDeque::new()),
                gate: Rc::new(ChangeGate::new()),
                tokens,
                policy,
                subscription: RefCell::new(None),
            }),
        }
    }
}

impl<I> Default for StateSyncBuilder<I>
where
    I: Interpreter + 'static,
    I::State: 'static,
    I::Context: 'static,
    I::Event: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
