//! Traffic Light
//!
//! This example mirrors a traffic light machine into observable state.
//!
//! Key concepts:
//! - Initial snapshot published before any event
//! - Context-only changes (fining a car) issue a new token, state stays put
//! - State changes (going green) issue a new token, context is shared
//! - Events arriving through a channel are forwarded automatically
//! - Teardown releases the channel subscription
//!
//! Run with: RUST_LOG=statesync=debug cargo run --example traffic_light

use serde::Serialize;
use statesync::builder::MachineBuilder;
use statesync::core::Event;
use statesync::machine::{Action, MachineInterpreter, MachineOptions};
use statesync::state_enum;
use statesync::sync::{StateSync, Subject};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Light {
        Red,
        Amber,
        Green,
    }
}

#[derive(Clone, Debug, Default, Serialize)]
struct Junction {
    car_count: u32,
    fined_plates: Vec<String>,
}

#[derive(Clone, Debug)]
enum Signal {
    GoGreen,
    GoAmber,
    GoRed,
    CountCar,
    FineCar { plate: String },
}

impl Event for Signal {
    fn event_type(&self) -> &str {
        match self {
            Self::GoGreen => "GO_GREEN",
            Self::GoAmber => "GO_AMBER",
            Self::GoRed => "GO_RED",
            Self::CountCar => "COUNT_CAR",
            Self::FineCar { .. } => "FINE_CAR",
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light Example ===\n");

    let config = MachineBuilder::<Light, Junction, Signal>::new()
        .initial(Light::Red)
        .state(Light::Red, |s| {
            s.on("GO_GREEN", |t| t.target(Light::Green))
                .on("FINE_CAR", |t| {
                    t.assign(|junction: &Junction, signal: &Signal| {
                        let mut next = junction.clone();
                        if let Signal::FineCar { plate } = signal {
                            next.fined_plates.push(plate.clone());
                        }
                        next
                    })
                })
        })
        .state(Light::Green, |s| {
            s.on("GO_AMBER", |t| t.target(Light::Amber))
                .on("COUNT_CAR", |t| t.action("countCar"))
        })
        .state(Light::Amber, |s| s.on("GO_RED", |t| t.target(Light::Red)))
        .build()
        .expect("valid traffic light configuration");

    let options = MachineOptions::new().action(
        "countCar",
        Action::assign(|junction: &Junction, _: &Signal| Junction {
            car_count: junction.car_count + 1,
            ..junction.clone()
        }),
    );

    let channel = Subject::new();
    let sync: StateSync<MachineInterpreter<Light, Junction, Signal>> =
        StateSync::builder().name("main-street").build();

    let _watcher = sync.subscribe(|observed| {
        println!(
            "  [{}] state={:?} cars={} fined={:?}",
            &observed.token().as_str()[..8],
            observed.state(),
            observed.context().car_count,
            observed.context().fined_plates,
        );
    });

    println!("Initializing:");
    sync.initialize_with_channel(Junction::default(), config, options, &channel)
        .expect("fresh adapter");

    println!("\nFining a car (context changes, light stays red):");
    sync.dispatch(Signal::FineCar {
        plate: "AB123".to_string(),
    });

    println!("\nGoing green through the channel:");
    channel.emit(Signal::GoGreen);

    println!("\nCounting cars:");
    channel.emit(Signal::CountCar);
    channel.emit(Signal::CountCar);

    println!("\nUnhandled event (nothing published):");
    sync.dispatch(Signal::GoRed);

    println!("\nCycling back to red:");
    sync.dispatch(Signal::GoAmber);
    sync.dispatch(Signal::GoRed);

    sync.teardown();
    println!("\nAfter teardown the channel is ignored:");
    channel.emit(Signal::GoGreen);
    println!("  state is still {:?}", sync.state().expect("initialized"));

    println!("\n=== Example Complete ===");
}
