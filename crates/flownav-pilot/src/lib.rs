//! Agent-side piloting: the actuation interface, a Tello-dialect UDP
//! driver, the dead-reckoned pilot, and the mission control loop.

pub mod actuator;
pub mod controller;
pub mod mission;
pub mod tello;

pub use actuator::{Actuator, NullActuator};
pub use controller::{CycleCommand, Pilot};
pub use mission::{fly, MissionConfig, MissionOutcome, MissionReport};
pub use tello::TelloActuator;
