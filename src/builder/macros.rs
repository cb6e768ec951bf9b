//! Macros for ergonomic state declarations.

/// Generate a `State` implementation for a simple enum.
///
/// Each variant's name is its state name.
///
/// # Example
///
/// ```
/// use statesync::core::State;
/// use statesync::state_enum;
///
/// state_enum! {
///     pub enum TrafficLight {
///         Red,
///         Amber,
///         Green,
///         Off,
///     }
///     final: [Off]
/// }
///
/// assert_eq!(TrafficLight::Amber.name(), "Amber");
/// assert!(TrafficLight::Off.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
