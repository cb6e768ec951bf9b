//! Core value types shared by machines and the adapter.
//!
//! - State names via the `State` trait
//! - Tagged events via the `Event` trait
//! - Guard predicates for transition control
//! - Immutable history tracking

mod event;
mod guard;
mod history;
mod state;

pub use event::Event;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::State;
