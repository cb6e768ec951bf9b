//! Adapter errors.

use thiserror::Error;

/// Errors that can occur while setting up a [`StateSync`](super::StateSync).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyncError {
    /// `initialize` was called on an adapter that already owns an interpreter.
    #[error("Adapter '{name}' is already initialized; create a new adapter instead of re-initializing")]
    AlreadyInitialized { name: String },
}
