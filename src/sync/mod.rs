//! Mirroring a live interpreter into observable state.
//!
//! The pieces, leaves first:
//!
//! - **Tokens**: a fresh [`ChangeToken`] for every accepted change
//! - **Observed state**: the `(state, context, token)` triple
//! - **Change gate**: the one place that commits changes and notifies observers
//! - **Novelty policies**: decide which interpreter callbacks reach the gate
//! - **Lifecycle**: [`StateSync`] builds, starts and listens to the interpreter
//! - **Channels**: optional external event streams forwarded to `dispatch`
//!
//! Everything here is single-threaded. Interpreter callbacks run on the
//! stack of the `dispatch` that caused them, so a reader never sees a
//! half-applied change.

mod adapter;
mod channel;
mod error;
mod gate;
mod interpreter;
mod novelty;
mod observed;
mod token;

pub use adapter::{Phase, StateSync, StateSyncBuilder};
pub use channel::{Channel, EventHandler, Subject, SubscriptionHandle};
pub use error::SyncError;
pub use interpreter::{
    ContextListener, ContextOf, EventOf, Interpreter, Machine, MachineDefinition, OptionsOf,
    Snapshot, StateOf, TransitionListener, TransitionRecord,
};
pub use novelty::{IdentityNovelty, NoveltyPolicy, ValueNovelty};
pub use observed::ObservedState;
pub use token::{ChangeToken, SequentialTokens, TokenGenerator, UuidTokens};
