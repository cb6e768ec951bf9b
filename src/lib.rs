//! Statesync: mirror a live state machine into observable state
//!
//! A [`StateSync`](sync::StateSync) owns a state machine interpreter and keeps
//! three things in step with it: the current state name, the current context,
//! and a change token that is replaced every time either of them actually
//! changes. Hosts read those values, or subscribe to be told when they move,
//! and push events back in through `dispatch` or an attached channel.
//!
//! # Core Concepts
//!
//! - **Sync**: the adapter, its change gate, novelty policies and channels
//! - **Machine**: a small reference interpreter the adapter can drive
//! - **Builder**: fluent construction of machine configurations
//! - **Core**: state names, events, guards and transition history
//!
//! # Example
//!
//! ```rust
//! use statesync::builder::MachineBuilder;
//! use statesync::core::Event;
//! use statesync::machine::{MachineInterpreter, MachineOptions};
//! use statesync::state_enum;
//! use statesync::sync::{StateSync, Subject};
//!
//! state_enum! {
//!     enum Light {
//!         Red,
//!         Green,
//!     }
//! }
//!
//! #[derive(Clone, Debug)]
//! enum LightEvent {
//!     GoGreen,
//!     CountCar,
//! }
//!
//! impl Event for LightEvent {
//!     fn event_type(&self) -> &str {
//!         match self {
//!             Self::GoGreen => "GO_GREEN",
//!             Self::CountCar => "COUNT_CAR",
//!         }
//!     }
//! }
//!
//! let config = MachineBuilder::<Light, u32, LightEvent>::new()
//!     .initial(Light::Red)
//!     .state(Light::Red, |s| s.on("GO_GREEN", |t| t.target(Light::Green)))
//!     .state(Light::Green, |s| s.on("COUNT_CAR", |t| t.assign(|cars, _| cars + 1)))
//!     .build()
//!     .unwrap();
//!
//! let channel = Subject::new();
//! let sync: StateSync<MachineInterpreter<Light, u32, LightEvent>> = StateSync::new();
//! sync.initialize_with_channel(0, config, MachineOptions::new(), &channel)
//!     .unwrap();
//!
//! channel.emit(LightEvent::GoGreen);
//! sync.dispatch(LightEvent::CountCar);
//!
//! assert_eq!(sync.state(), Some(Light::Green));
//! assert_eq!(*sync.context().unwrap(), 1);
//! sync.teardown();
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{Event, Guard, State, StateHistory, StateTransition};
pub use crate::sync::{ChangeToken, ObservedState, StateSync, SyncError};
