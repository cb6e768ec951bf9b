//! State name trait for machine states.
//!
//! Every state a machine declares is a value of a type implementing
//! [`State`]. The adapter mirrors exactly one of them as "current".

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine state names.
///
/// A state name is a token drawn from the finite set a machine declares.
/// Implementations are plain values: cloneable for mirroring, comparable so
/// the adapter can tell whether a transition moved the visible state, and
/// serializable so a mirrored snapshot can be handed to a host.
///
/// # Example
///
/// ```rust
/// use statesync::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Light {
///     Red,
///     Amber,
///     Green,
///     Off,
/// }
///
/// impl State for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Red => "RED",
///             Self::Amber => "AMBER",
///             Self::Green => "GREEN",
///             Self::Off => "OFF",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Off)
///     }
/// }
///
/// assert_eq!(Light::Amber.name(), "AMBER");
/// assert!(Light::Off.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// An interpreter that reaches a final state stops accepting events.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
