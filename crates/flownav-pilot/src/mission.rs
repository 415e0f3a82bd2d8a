//! The runtime control loop: flow-field sampling down to actuation, with
//! cooperative stop conditions and a summary report.

use crate::actuator::Actuator;
use crate::controller::Pilot;
use anyhow::Result;
use chrono::{DateTime, Utc};
use flownav_core::planner::local_avoidance;
use flownav_core::Octree;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Scale from flow vector to commanded velocity, cm/s per unit
    pub speed: f64,
    /// How long each command is held before re-sampling
    pub command_hold: Duration,
    /// Abort threshold on accrued mission time
    pub timeout: Duration,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            speed: 100.0,
            command_hold: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionOutcome {
    /// The nearest cell matched the destination cell
    Reached,
    /// Accrued mission time exceeded the timeout
    TimedOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionReport {
    pub mission_id: Uuid,
    pub outcome: MissionOutcome,
    pub cycles: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Dead-reckoned position at landing, meters
    pub final_position: DVec3,
    /// Dead-reckoned yaw at landing, radians
    pub final_yaw: f64,
}

/// Fly a populated flow field until the destination cell is reached or the
/// mission times out, bracketed by takeoff and landing.
///
/// Each cycle samples the flow vector of the nearest leaf cell, runs the
/// local-avoidance pass, commands the decomposed velocities, holds the
/// command for the configured period, then dead-reckons. Stop conditions
/// are checked at the top of the cycle; a command once issued always runs
/// its full hold.
///
/// The mission clock advances by the hold period whether or not the hold
/// actually slept, so a debug run accumulates exactly the estimate a live
/// run would.
pub fn fly<A: Actuator>(
    pilot: &mut Pilot<A>,
    field: &Octree,
    destination: DVec3,
    config: &MissionConfig,
) -> Result<MissionReport> {
    let mission_id = Uuid::new_v4();
    let started_at = Utc::now();
    let destination_id = field.closest_cell(destination, true).id.clone();
    let hold_secs = config.command_hold.as_secs_f64();
    let timeout_secs = config.timeout.as_secs_f64();

    tracing::info!(%mission_id, %destination_id, "mission start");
    pilot.takeoff()?;

    let mut elapsed = 0.0_f64;
    let mut cycles = 0u32;
    let outcome = loop {
        let current = field.closest_cell(pilot.position(), true);
        if current.id == destination_id {
            break MissionOutcome::Reached;
        }
        if elapsed > timeout_secs {
            break MissionOutcome::TimedOut;
        }

        let desired = local_avoidance(current.vector);
        tracing::debug!(cell = %current.id, ?desired, elapsed, "control cycle");
        let command = pilot.send_instructions(desired, config.speed)?;

        if !pilot.debug() {
            std::thread::sleep(config.command_hold);
        }
        elapsed += hold_secs;
        cycles += 1;

        // Commanded velocities are cm/s; the estimate is meters.
        pilot.update_position(
            command.dx * hold_secs / 100.0,
            command.dy * hold_secs / 100.0,
            command.dz * hold_secs / 100.0,
            command.rotation,
        );
    };

    pilot.land()?;
    tracing::info!(?outcome, cycles, "mission complete");

    Ok(MissionReport {
        mission_id,
        outcome,
        cycles,
        started_at,
        ended_at: Utc::now(),
        final_position: pilot.position(),
        final_yaw: pilot.yaw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::NullActuator;
    use flownav_core::{populate_flow_field, GraphConfig, LineOfSightOracle};

    struct ClearSight;

    impl LineOfSightOracle for ClearSight {
        fn is_blocked(&self, _a: DVec3, _b: DVec3) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    fn depth_one_field(destination: DVec3) -> Octree {
        let mut tree = Octree::new(DVec3::ZERO, 10.0, 1);
        tree.cell_by_id_mut("root").unwrap().subdivide().unwrap();
        populate_flow_field(&mut tree, destination, &GraphConfig::default(), &ClearSight)
            .unwrap();
        tree
    }

    fn quick_config() -> MissionConfig {
        MissionConfig {
            speed: 100.0,
            command_hold: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn a_straight_shot_reaches_the_destination() {
        let destination = DVec3::new(2.5, 2.5, 2.5);
        let field = depth_one_field(destination);
        let mut pilot = Pilot::new(NullActuator, DVec3::new(-2.5, -2.5, -2.5), true);

        let report = fly(&mut pilot, &field, destination, &quick_config()).unwrap();

        assert_eq!(report.outcome, MissionOutcome::Reached);
        // The start cell's flow vector covers the whole hop in one hold.
        assert_eq!(report.cycles, 1);
        assert_eq!(report.final_position, destination);
    }

    #[test]
    fn an_unpopulated_field_times_out() {
        // No vectors anywhere: the agent hovers in place until the clock
        // runs down.
        let mut tree = Octree::new(DVec3::ZERO, 10.0, 1);
        tree.cell_by_id_mut("root").unwrap().subdivide().unwrap();

        let mut pilot = Pilot::new(NullActuator, DVec3::new(-2.5, -2.5, -2.5), true);
        let config = MissionConfig {
            timeout: Duration::from_secs(3),
            ..quick_config()
        };

        let report = fly(&mut pilot, &tree, DVec3::new(2.5, 2.5, 2.5), &config).unwrap();

        assert_eq!(report.outcome, MissionOutcome::TimedOut);
        assert_eq!(report.cycles, 4);
        assert_eq!(report.final_position, DVec3::new(-2.5, -2.5, -2.5));
    }

    #[test]
    fn starting_at_the_destination_lands_immediately() {
        let destination = DVec3::new(2.5, 2.5, 2.5);
        let field = depth_one_field(destination);
        let mut pilot = Pilot::new(NullActuator, destination, true);

        let report = fly(&mut pilot, &field, destination, &quick_config()).unwrap();

        assert_eq!(report.outcome, MissionOutcome::Reached);
        assert_eq!(report.cycles, 0);
    }
}
