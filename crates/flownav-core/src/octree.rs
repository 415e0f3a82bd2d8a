//! Octree partitioning of a cubic volume.
//!
//! A [`Cell`] is a cube, either a leaf or split into exactly eight children
//! that tile it. The tree owns its nodes outright: the only way back to a
//! cell is the lineage encoded in its id (`"root-3-7"` is child 7 of child
//! 3 of the root), which keeps traversal duplicate-free by construction.

use crate::error::NavError;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Occupancy of a cell, asked of the occupancy oracle at most once and
/// cached here. `Unknown` only exists before the build passes finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    #[default]
    Unknown,
    Free,
    Occupied,
}

/// A cubic region of the scene volume.
#[derive(Debug, Clone)]
pub struct Cell {
    pub id: String,
    /// Center point of the cube
    pub center: DVec3,
    /// Edge length
    pub size: f64,
    pub occupancy: Occupancy,
    /// Flow direction toward the active destination; zero until populated
    /// and zero again for cells with no route.
    pub vector: DVec3,
    children: Option<Box<[Cell; 8]>>,
}

impl Cell {
    pub fn new(id: String, center: DVec3, size: f64) -> Self {
        Self {
            id,
            center,
            size,
            occupancy: Occupancy::default(),
            vector: DVec3::ZERO,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<&[Cell; 8]> {
        self.children.as_deref()
    }

    fn children_mut(&mut self) -> Option<&mut [Cell; 8]> {
        self.children.as_deref_mut()
    }

    /// Split this cell into eight children of half the edge length, centers
    /// offset by ±size/4 along each axis so they tile the parent exactly.
    /// Child order is fixed and axis-major: x outermost, then y, then z.
    pub fn subdivide(&mut self) -> Result<(), NavError> {
        if self.children.is_some() {
            return Err(NavError::AlreadySubdivided(self.id.clone()));
        }

        let offset = self.size / 4.0;
        let child_size = self.size / 2.0;
        let children: [Cell; 8] = std::array::from_fn(|i| {
            let sx = if i & 4 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 1 == 0 { -1.0 } else { 1.0 };
            Cell::new(
                format!("{}-{i}", self.id),
                self.center + DVec3::new(sx, sy, sz) * offset,
                child_size,
            )
        });
        self.children = Some(Box::new(children));
        Ok(())
    }
}

/// The tree itself: a root cell covering the scene bounds plus the maximum
/// number of subdivision passes the builder may run.
#[derive(Debug, Clone)]
pub struct Octree {
    root: Cell,
    pub max_depth: usize,
}

impl Octree {
    pub fn new(center: DVec3, size: f64, max_depth: usize) -> Self {
        Self {
            root: Cell::new("root".to_string(), center, size),
            max_depth,
        }
    }

    pub fn root(&self) -> &Cell {
        &self.root
    }

    /// All cells in fixed pre-order, or only the leaves. An explicit
    /// worklist keeps the ordering deterministic and each node visited
    /// exactly once.
    pub fn all_cells(&self, leaf_only: bool) -> Vec<&Cell> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(cell) = stack.pop() {
            match cell.children() {
                Some(children) => {
                    if !leaf_only {
                        out.push(cell);
                    }
                    for child in children.iter().rev() {
                        stack.push(child);
                    }
                }
                None => out.push(cell),
            }
        }
        out
    }

    /// Look a cell up by walking the lineage its id encodes. O(depth).
    pub fn cell_by_id(&self, id: &str) -> Option<&Cell> {
        let mut parts = id.split('-');
        if parts.next()? != "root" {
            return None;
        }
        let mut cell = &self.root;
        for part in parts {
            let index: usize = part.parse().ok()?;
            cell = cell.children()?.get(index)?;
        }
        Some(cell)
    }

    pub fn cell_by_id_mut(&mut self, id: &str) -> Option<&mut Cell> {
        let mut parts = id.split('-');
        if parts.next()? != "root" {
            return None;
        }
        let mut cell = &mut self.root;
        for part in parts {
            let index: usize = part.parse().ok()?;
            cell = cell.children_mut()?.get_mut(index)?;
        }
        Some(cell)
    }

    /// The cell whose center is nearest to `position`, by squared Euclidean
    /// distance. Ties go to the first cell encountered in traversal order.
    pub fn closest_cell(&self, position: DVec3, leaf_only: bool) -> &Cell {
        let mut best = &self.root;
        let mut best_dist = f64::INFINITY;
        for cell in self.all_cells(leaf_only) {
            let dist = cell.center.distance_squared(position);
            if dist < best_dist {
                best = cell;
                best_dist = dist;
            }
        }
        best
    }

    /// Leaf cells whose centers lie within `threshold` of the given cell's
    /// center, excluding the cell itself. An empty result means the
    /// threshold is too small for the cell density at this depth.
    pub fn neighbors_within(&self, cell: &Cell, threshold: f64) -> Result<Vec<&Cell>, NavError> {
        let mut result = Vec::new();
        for candidate in self.all_cells(true) {
            let dist = candidate.center.distance(cell.center);
            if dist > 0.0 && dist <= threshold {
                result.push(candidate);
            }
        }
        if result.is_empty() {
            return Err(NavError::NoNeighbors {
                cell_id: cell.id.clone(),
                threshold,
            });
        }
        Ok(result)
    }
}
