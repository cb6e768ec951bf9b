//! A small interpreter for flat state machines.
//!
//! This is one implementation of the [`sync`](crate::sync) interfaces:
//! states with event-keyed transitions, optional guards, and assign/effect
//! actions that can be supplied by name through [`MachineOptions`].
//!
//! - [`MachineConfig`]: the validated description (see [`crate::builder`])
//! - [`StateMachine`]: a configuration bound to a context and options
//! - [`MachineInterpreter`]: processes events and notifies listeners
//!
//! Transition selection is deliberately simple: the first transition for the
//! event whose guard passes is taken, its actions run in declaration order,
//! and the machine stops once it enters a final state.

mod config;
mod definition;
mod interpreter;
mod options;

pub use config::{Action, ActionRef, GuardRef, MachineConfig, StateNode, TransitionConfig};
pub use definition::StateMachine;
pub use interpreter::{MachineInterpreter, Status};
pub use options::{MachineOptions, DEFAULT_HISTORY_LIMIT};
