//! Tagged events sent into a machine.

use std::fmt::Debug;

/// An event carrying a `type` discriminant and an optional payload.
///
/// Machines key their transitions on [`Event::event_type`]; payload fields
/// are read by guards and actions through the concrete event value.
///
/// # Example
///
/// ```rust
/// use statesync::core::Event;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum LightEvent {
///     GoGreen,
///     FineCar { plate: String },
/// }
///
/// impl Event for LightEvent {
///     fn event_type(&self) -> &str {
///         match self {
///             Self::GoGreen => "GO_GREEN",
///             Self::FineCar { .. } => "FINE_CAR",
///         }
///     }
/// }
///
/// let event = LightEvent::FineCar { plate: "AB123".to_string() };
/// assert_eq!(event.event_type(), "FINE_CAR");
/// ```
pub trait Event: Clone + Debug {
    /// The discriminant transitions are keyed on.
    fn event_type(&self) -> &str;
}
