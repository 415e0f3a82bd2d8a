//! Simulated scenes and preset missions for the flownav CLI.

pub mod presets;
pub mod scene;

pub use scene::{BoxObstacle, Scene};
