//! The pilot: one desired velocity vector in, discrete actuation out, with
//! an open-loop dead-reckoned estimate of where that has taken the agent.

use crate::actuator::Actuator;
use anyhow::Result;
use flownav_core::geometry::{
    normalize_angle, planar_heading, radians_to_centidegrees, shortest_rotation,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// What one control cycle asked of the actuator: world-frame velocity
/// components in actuator units (cm/s) and the signed yaw change in
/// radians. Consumed by the loop for dead reckoning, then discarded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CycleCommand {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rotation: f64,
}

pub struct Pilot<A> {
    actuator: A,
    /// Dead-reckoned position estimate, meters. Seeded by the caller and
    /// never corrected by any sensor.
    position: DVec3,
    /// Yaw estimate, radians. 0 faces +X, positive turns counter-clockwise
    /// about +Z.
    yaw: f64,
    /// When set, commands are computed and logged but never sent.
    debug: bool,
}

impl<A: Actuator> Pilot<A> {
    pub fn new(actuator: A, starting_position: DVec3, debug: bool) -> Self {
        Self {
            actuator,
            position: starting_position,
            yaw: 0.0,
            debug,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn takeoff(&mut self) -> Result<()> {
        tracing::info!(debug = self.debug, "takeoff");
        if self.debug {
            return Ok(());
        }
        self.actuator.takeoff()
    }

    pub fn land(&mut self) -> Result<()> {
        tracing::info!(debug = self.debug, "land");
        if self.debug {
            return Ok(());
        }
        self.actuator.land()
    }

    /// Decompose one desired velocity vector into actuation commands.
    ///
    /// Yaw first: the planar (x, y) projection of the vector implies a
    /// target heading, and the shorter turn onto it is commanded in
    /// centidegrees. A vector with no planar component keeps the current
    /// heading. Translation second: forward/back carries the full planar
    /// magnitude, up/down the z component, and left/right stays zero —
    /// lateral motion is always yaw plus forward, never strafe.
    ///
    /// Returns the cycle record in actuator units; the caller integrates it
    /// into the position estimate after the command has been held.
    pub fn send_instructions(&mut self, desired: DVec3, speed: f64) -> Result<CycleCommand> {
        let planar = DVec3::new(desired.x, desired.y, 0.0);
        let rotation = if planar.length_squared() > 0.0 {
            shortest_rotation(self.yaw, planar_heading(desired))
        } else {
            0.0
        };

        let forward_back = planar.length() * speed;
        let up_down = desired.z * speed;
        let command = CycleCommand {
            dx: desired.x * speed,
            dy: desired.y * speed,
            dz: desired.z * speed,
            rotation,
        };

        if self.debug {
            tracing::info!(
                dx = command.dx,
                dy = command.dy,
                dz = command.dz,
                rotation_deg = rotation.to_degrees(),
                "debug mode: command computed, not sent"
            );
            return Ok(command);
        }

        let centidegrees = radians_to_centidegrees(rotation.abs());
        if rotation > 0.0 {
            self.actuator.rotate_counter_clockwise(centidegrees)?;
        } else if rotation < 0.0 {
            self.actuator.rotate_clockwise(centidegrees)?;
        }
        self.actuator
            .set_velocities(forward_back.round() as i32, 0, up_down.round() as i32, 0)?;

        Ok(command)
    }

    /// Dead reckoning: integrate one cycle's deltas. The caller converts
    /// actuator units to meters (and scales by the hold time) before
    /// calling; nothing else ever mutates the estimate.
    pub fn update_position(&mut self, dx: f64, dy: f64, dz: f64, rotation: f64) {
        self.position += DVec3::new(dx, dy, dz);
        self.yaw = normalize_angle(self.yaw + rotation);
    }
}
