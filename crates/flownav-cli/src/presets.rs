//! Named scenes and destinations for quick missions.
//!
//! The destination table stands in for the upstream command-interpretation
//! stage: the pipeline only ever needs a resolved point. Unknown names are
//! errors; nothing here falls back to a default target.

use crate::scene::{BoxObstacle, Scene};
use anyhow::{bail, Result};
use glam::DVec3;
use rand::Rng;

/// Default test volume: a 10 m cube centered 5 m above the origin.
const BOUNDS_CENTER: DVec3 = DVec3::new(0.0, 0.0, 5.0);
const BOUNDS_SIZE: f64 = 10.0;

pub fn by_name(name: &str) -> Result<Scene> {
    match name {
        "open_room" => Ok(open_room()),
        "pillar" => Ok(pillar()),
        "wall_gap" => Ok(wall_gap()),
        "scatter" => Ok(scatter(6)),
        other => bail!(
            "unknown scene preset {other:?} (expected open_room, pillar, wall_gap, or scatter)"
        ),
    }
}

/// Empty volume. Note the octree never subdivides here, so the graph stage
/// will report the single root leaf as having no neighbors.
pub fn open_room() -> Scene {
    Scene {
        name: "open_room".to_string(),
        bounds_center: BOUNDS_CENTER,
        bounds_size: BOUNDS_SIZE,
        obstacles: Vec::new(),
    }
}

/// A single column through the middle of the volume.
pub fn pillar() -> Scene {
    Scene {
        name: "pillar".to_string(),
        bounds_center: BOUNDS_CENTER,
        bounds_size: BOUNDS_SIZE,
        obstacles: vec![BoxObstacle::new(
            DVec3::new(-0.75, -0.75, 0.0),
            DVec3::new(0.75, 0.75, 10.0),
        )],
    }
}

/// A wall across the volume with a flight gap on the +x side.
pub fn wall_gap() -> Scene {
    Scene {
        name: "wall_gap".to_string(),
        bounds_center: BOUNDS_CENTER,
        bounds_size: BOUNDS_SIZE,
        obstacles: vec![BoxObstacle::new(
            DVec3::new(-5.0, -0.5, 0.0),
            DVec3::new(2.0, 0.5, 10.0),
        )],
    }
}

/// Randomly scattered crates.
pub fn scatter(count: usize) -> Scene {
    let mut rng = rand::rng();
    let mut obstacles = Vec::with_capacity(count);
    for _ in 0..count {
        let center = DVec3::new(
            rng.random_range(-4.0..4.0),
            rng.random_range(-4.0..4.0),
            rng.random_range(1.0..9.0),
        );
        let half = rng.random_range(0.3..0.9);
        obstacles.push(BoxObstacle::new(
            center - DVec3::splat(half),
            center + DVec3::splat(half),
        ));
    }
    Scene {
        name: "scatter".to_string(),
        bounds_center: BOUNDS_CENTER,
        bounds_size: BOUNDS_SIZE,
        obstacles,
    }
}

/// Destinations the mission runner accepts by name.
pub fn destination(name: &str) -> Result<DVec3> {
    match name {
        "home" => Ok(DVec3::new(0.0, 0.0, 5.0)),
        "far_corner" => Ok(DVec3::new(3.75, 3.75, 8.75)),
        "window" => Ok(DVec3::new(3.5, 0.0, 6.0)),
        other => bail!("unknown destination {other:?}; pass explicit x,y,z coordinates instead"),
    }
}
