//! Simulated scenes: axis-aligned box obstacles standing in for host
//! application geometry. A [`Scene`] implements both navigation oracles, so
//! the whole pipeline runs against it without a 3-D host attached.

use anyhow::{Context, Result};
use flownav_core::{LineOfSightOracle, OccupancyOracle};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Axis-aligned box obstacle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoxObstacle {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoxObstacle {
    /// Build from any two opposite corners.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    fn overlaps_cube(&self, center: DVec3, size: f64) -> bool {
        let half = size / 2.0;
        (0..3).all(|axis| {
            center[axis] - half <= self.max[axis] && center[axis] + half >= self.min[axis]
        })
    }

    /// Slab test: does the segment a->b pass through the box?
    fn intersects_segment(&self, a: DVec3, b: DVec3) -> bool {
        let dir = b - a;
        let mut t_min = 0.0_f64;
        let mut t_max = 1.0_f64;

        for axis in 0..3 {
            if dir[axis].abs() < f64::EPSILON {
                if a[axis] < self.min[axis] || a[axis] > self.max[axis] {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / dir[axis];
            let mut t0 = (self.min[axis] - a[axis]) * inv;
            let mut t1 = (self.max[axis] - a[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// A bounded volume with box obstacles, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    /// Center of the volume the octree will cover
    pub bounds_center: DVec3,
    /// Edge length of that volume
    pub bounds_size: f64,
    #[serde(default)]
    pub obstacles: Vec<BoxObstacle>,
}

impl Scene {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing scene file {}", path.display()))
    }
}

impl OccupancyOracle for Scene {
    fn is_occupied(&self, center: DVec3, size: f64) -> Result<bool> {
        Ok(self
            .obstacles
            .iter()
            .any(|obstacle| obstacle.overlaps_cube(center, size)))
    }
}

impl LineOfSightOracle for Scene {
    fn is_blocked(&self, a: DVec3, b: DVec3) -> Result<bool> {
        Ok(self
            .obstacles
            .iter()
            .any(|obstacle| obstacle.intersects_segment(a, b)))
    }
}
