//! Actuation interface consumed by the pilot.

use anyhow::Result;

/// Low-level flight commands. Angles are centidegrees, velocities cm/s;
/// concrete drivers own the wire encoding and convert from these units.
pub trait Actuator {
    fn takeoff(&mut self) -> Result<()>;
    fn land(&mut self) -> Result<()>;
    /// Rotate right (clockwise seen from above) by `centidegrees`.
    fn rotate_clockwise(&mut self, centidegrees: i32) -> Result<()>;
    /// Rotate left by `centidegrees`.
    fn rotate_counter_clockwise(&mut self, centidegrees: i32) -> Result<()>;
    /// Set the four velocity channels: forward/back, left/right, up/down,
    /// and yaw rate.
    fn set_velocities(
        &mut self,
        forward_back: i32,
        left_right: i32,
        up_down: i32,
        yaw: i32,
    ) -> Result<()>;
}

/// Accepts every command and does nothing. Stands in for the real drone in
/// simulated missions and tests.
#[derive(Debug, Default)]
pub struct NullActuator;

impl Actuator for NullActuator {
    fn takeoff(&mut self) -> Result<()> {
        Ok(())
    }

    fn land(&mut self) -> Result<()> {
        Ok(())
    }

    fn rotate_clockwise(&mut self, _centidegrees: i32) -> Result<()> {
        Ok(())
    }

    fn rotate_counter_clockwise(&mut self, _centidegrees: i32) -> Result<()> {
        Ok(())
    }

    fn set_velocities(
        &mut self,
        _forward_back: i32,
        _left_right: i32,
        _up_down: i32,
        _yaw: i32,
    ) -> Result<()> {
        Ok(())
    }
}
