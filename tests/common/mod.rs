//! Traffic-light machine shared by the integration tests.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use statesync::builder::MachineBuilder;
use statesync::core::{Event, State};
use statesync::machine::{Action, MachineConfig, MachineInterpreter, MachineOptions};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TrafficLight {
    Red,
    Amber,
    Green,
}

impl State for TrafficLight {
    fn name(&self) -> &str {
        match self {
            Self::Red => "RED",
            Self::Amber => "AMBER",
            Self::Green => "GREEN",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct TrafficLightContext {
    pub car_count: u32,
    pub fined_plates: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TrafficLightEvent {
    GoGreen,
    GoAmber,
    GoRed,
    CountCar,
    FineCar { plate: String },
}

impl Event for TrafficLightEvent {
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

pub type TrafficLightInterpreter =
    MachineInterpreter<TrafficLight, TrafficLightContext, TrafficLightEvent>;

/// RED -GO_GREEN-> GREEN -GO_AMBER-> AMBER -GO_RED-> RED.
/// RED fines cars; GREEN counts them through the `countCar` named action.
pub fn traffic_light_config() -> MachineConfig<TrafficLight, TrafficLightContext, TrafficLightEvent>
{
    MachineBuilder::new()
        .initial(TrafficLight::Red)
        .state(TrafficLight::Red, |s| {
            s.on("GO_GREEN", |t| t.target(TrafficLight::Green))
                .on("FINE_CAR", |t| {
                    t.assign(|ctx: &TrafficLightContext, event: &TrafficLightEvent| {
                        let mut fined_plates = ctx.fined_plates.clone();
                        if let TrafficLightEvent::FineCar { plate } = event {
                            fined_plates.push(plate.clone());
                        }
                        TrafficLightContext {
                            car_count: ctx.car_count,
                            fined_plates,
                        }
                    })
                })
        })
        .state(TrafficLight::Amber, |s| {
            s.on("GO_RED", |t| t.target(TrafficLight::Red))
        })
        .state(TrafficLight::Green, |s| {
            s.on("GO_AMBER", |t| t.target(TrafficLight::Amber))
                .on("COUNT_CAR", |t| t.action("countCar"))
        })
        .build()
        .expect("traffic light config is valid")
}

pub fn traffic_light_options() -> MachineOptions<TrafficLightContext, TrafficLightEvent> {
    MachineOptions::new().action(
        "countCar",
        Action::assign(|ctx: &TrafficLightContext, _: &TrafficLightEvent| TrafficLightContext {
            car_count: ctx.car_count + 1,
            fined_plates: ctx.fined_plates.clone(),
        }),
    )
}

pub fn fine(plate: &str) -> TrafficLightEvent {
    TrafficLightEvent::FineCar {
        plate: plate.to_string(),
    }
}
