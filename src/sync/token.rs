//! Change tokens and their generators.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Opaque identifier stamped on every accepted change.
///
/// Consumers compare tokens as a cheap dirty check instead of comparing
/// state or context deeply. Tokens carry no ordering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeToken(String);

impl ChangeToken {
    /// Wrap an already generated identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh change tokens.
///
/// Every call must return a token distinct from all previous ones for the
/// lifetime of the adapter it is injected into.
pub trait TokenGenerator {
    fn generate(&self) -> ChangeToken;
}

impl<T: TokenGenerator + ?Sized> TokenGenerator for Rc<T> {
    fn generate(&self) -> ChangeToken {
        (**self).generate()
    }
}

/// Random UUID v4 tokens. The default generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidTokens;

impl TokenGenerator for UuidTokens {
    fn generate(&self) -> ChangeToken {
        ChangeToken(Uuid::new_v4().to_string())
    }
}

/// Deterministic counting tokens (`"1"`, `"2"`, ...).
///
/// Useful in tests and snapshot fixtures where random tokens get in the way.
///
/// # Example
///
/// ```rust
/// use statesync::sync::{SequentialTokens, TokenGenerator};
///
/// let tokens = SequentialTokens::new();
/// assert_eq!(tokens.generate().as_str(), "1");
/// assert_eq!(tokens.generate().as_str(), "2");
/// assert_eq!(tokens.issued(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SequentialTokens {
    next: Cell<u64>,
}

impl SequentialTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens generated so far.
    pub fn issued(&self) -> u64 {
        self.next.get()
    }
}

impl TokenGenerator for SequentialTokens {
    fn generate(&self) -> ChangeToken {
        let n = self.next.get() + 1;
        self.next.set(n);
        ChangeToken(n.to_string())
    }
}
