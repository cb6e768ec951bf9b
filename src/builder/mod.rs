//! Builder API for machine configurations.
//!
//! Fluent builders for states and transitions, plus the [`state_enum!`]
//! macro for declaring state name enums with minimal boilerplate.
//!
//! [`state_enum!`]: crate::state_enum

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::{MachineBuilder, StateBuilder};
pub use transition::TransitionBuilder;
