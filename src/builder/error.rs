//! Build errors for machine configurations.

use thiserror::Error;

/// Errors that can occur when building a machine configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state '{state}' is not declared. Add it with .state(...)")]
    UnknownInitialState { state: String },

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Transition from '{from}' on '{event}' targets undeclared state '{target}'")]
    UnknownTarget {
        from: String,
        event: String,
        target: String,
    },
}
