//! Recursive occupied-cell subdivision of the scene volume.

use crate::error::NavError;
use crate::octree::{Occupancy, Octree};
use crate::oracle::OccupancyOracle;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Bounds and resolution of the space representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Center of the root cell encompassing the whole scene
    pub center: DVec3,
    /// Edge length of the root cell
    pub size: f64,
    /// Number of subdivision passes to run
    pub max_depth: usize,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        // A 10 m test volume centered 5 m above the origin.
        Self {
            center: DVec3::new(0.0, 0.0, 5.0),
            size: 10.0,
            max_depth: 3,
        }
    }
}

/// Build the octree for a scene: exactly `max_depth` passes, each splitting
/// every occupied leaf, so the tree stays coarse in open space and refines
/// only around obstacles. There is no early termination when a pass splits
/// nothing.
///
/// Occupancy is asked of the oracle once per cell and cached on the cell.
/// The passes only see cells that existed when they started, so a closing
/// sweep evaluates the children minted by the final pass; the finished tree
/// contains no `Unknown`.
pub fn build_space<O: OccupancyOracle>(
    config: &SpaceConfig,
    oracle: &O,
) -> Result<Octree, NavError> {
    let mut octree = Octree::new(config.center, config.size, config.max_depth);

    for _ in 0..config.max_depth {
        for id in cell_ids(&octree) {
            let occupied = ensure_occupancy(&mut octree, &id, oracle)?;
            let Some(cell) = octree.cell_by_id_mut(&id) else {
                continue;
            };
            if occupied && cell.is_leaf() {
                cell.subdivide()?;
            }
        }
    }

    for id in cell_ids(&octree) {
        ensure_occupancy(&mut octree, &id, oracle)?;
    }

    Ok(octree)
}

fn cell_ids(octree: &Octree) -> Vec<String> {
    octree
        .all_cells(false)
        .iter()
        .map(|cell| cell.id.clone())
        .collect()
}

/// Return whether the cell is occupied, querying the oracle only when the
/// cached answer is still `Unknown`.
fn ensure_occupancy<O: OccupancyOracle>(
    octree: &mut Octree,
    id: &str,
    oracle: &O,
) -> Result<bool, NavError> {
    let Some(cell) = octree.cell_by_id(id) else {
        return Ok(false);
    };
    match cell.occupancy {
        Occupancy::Occupied => Ok(true),
        Occupancy::Free => Ok(false),
        Occupancy::Unknown => {
            let occupied = oracle
                .is_occupied(cell.center, cell.size)
                .map_err(NavError::Oracle)?;
            if let Some(cell) = octree.cell_by_id_mut(id) {
                cell.occupancy = if occupied {
                    Occupancy::Occupied
                } else {
                    Occupancy::Free
                };
            }
            Ok(occupied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Empty;

    impl OccupancyOracle for Empty {
        fn is_occupied(&self, _center: DVec3, _size: f64) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    struct Solid;

    impl OccupancyOracle for Solid {
        fn is_occupied(&self, _center: DVec3, _size: f64) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    /// An obstacle filling the half-space x < -1.
    struct HalfSpace;

    impl OccupancyOracle for HalfSpace {
        fn is_occupied(&self, center: DVec3, size: f64) -> anyhow::Result<bool> {
            Ok(center.x - size / 2.0 < -1.0)
        }
    }

    struct Counting(AtomicUsize);

    impl OccupancyOracle for Counting {
        fn is_occupied(&self, _center: DVec3, _size: f64) -> anyhow::Result<bool> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(true)
        }
    }

    struct Failing;

    impl OccupancyOracle for Failing {
        fn is_occupied(&self, _center: DVec3, _size: f64) -> anyhow::Result<bool> {
            Err(anyhow!("scene backend unavailable"))
        }
    }

    fn config(max_depth: usize) -> SpaceConfig {
        SpaceConfig {
            center: DVec3::ZERO,
            size: 10.0,
            max_depth,
        }
    }

    #[test]
    fn empty_scenes_stay_coarse() {
        let tree = build_space(&config(3), &Empty).unwrap();
        assert_eq!(tree.all_cells(false).len(), 1);
        assert_eq!(tree.root().occupancy, Occupancy::Free);
    }

    #[test]
    fn solid_scenes_refine_to_max_depth() {
        let tree = build_space(&config(2), &Solid).unwrap();
        // 1 + 8 + 64
        assert_eq!(tree.all_cells(false).len(), 73);
        assert_eq!(tree.all_cells(true).len(), 64);
        for cell in tree.all_cells(false) {
            assert_eq!(cell.occupancy, Occupancy::Occupied);
        }
    }

    #[test]
    fn free_cells_are_never_subdivided() {
        let tree = build_space(&config(2), &HalfSpace).unwrap();

        // Root straddles the obstacle, so it splits; only its four -x
        // children straddle it too and split again.
        assert_eq!(tree.all_cells(false).len(), 1 + 8 + 32);
        for cell in tree.all_cells(false) {
            assert_ne!(cell.occupancy, Occupancy::Unknown);
            if cell.occupancy == Occupancy::Free {
                assert!(cell.is_leaf());
            }
        }
    }

    #[test]
    fn every_cell_is_queried_exactly_once() {
        let oracle = Counting(AtomicUsize::new(0));
        let tree = build_space(&config(2), &oracle).unwrap();
        assert_eq!(oracle.0.load(Ordering::Relaxed), tree.all_cells(false).len());
    }

    #[test]
    fn oracle_failures_propagate() {
        assert!(matches!(
            build_space(&config(1), &Failing),
            Err(NavError::Oracle(_))
        ));
    }
}
