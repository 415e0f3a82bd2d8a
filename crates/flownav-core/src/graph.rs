//! Conversion of octree leaves into a weighted navigability graph.

use crate::error::NavError;
use crate::octree::{Cell, Occupancy, Octree};
use crate::oracle::LineOfSightOracle;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Tuning for graph construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Maximum center-to-center distance for two leaves to count as
    /// neighbors, in scene units
    pub distance_threshold: f64,
    /// How many of the closest neighbors each leaf keeps
    pub top_k_neighbors: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 1000.0,
            top_k_neighbors: 8,
        }
    }
}

/// Weighted undirected graph over leaf cell ids.
///
/// A derived, disposable view: it holds ids and centers, never cells, and
/// is rebuilt from scratch whenever the geometry changes. Adjacency lives
/// in ordered maps so iteration order (and with it planner tie-breaking)
/// is reproducible run to run.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    adjacency: BTreeMap<String, BTreeMap<String, f64>>,
    centers: HashMap<String, DVec3>,
}

impl SceneGraph {
    fn add_edge(&mut self, a: &Cell, b: &Cell, weight: f64) {
        self.centers.insert(a.id.clone(), a.center);
        self.centers.insert(b.id.clone(), b.center);
        self.adjacency
            .entry(a.id.clone())
            .or_default()
            .insert(b.id.clone(), weight);
        self.adjacency
            .entry(b.id.clone())
            .or_default()
            .insert(a.id.clone(), weight);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn center(&self, id: &str) -> Option<DVec3> {
        self.centers.get(id).copied()
    }

    /// Neighbors of a node with edge weights, in id order.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(n, w)| (n.as_str(), *w)))
    }

    /// Every stored directed adjacency entry (each undirected edge shows up
    /// twice, once per direction).
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.adjacency.iter().flat_map(|(from, edges)| {
            edges
                .iter()
                .map(move |(to, w)| (from.as_str(), to.as_str(), *w))
        })
    }
}

/// Build the navigability graph from the octree's leaves.
///
/// Every leaf ranks its in-threshold neighbors by ascending distance and
/// keeps the closest `top_k_neighbors`. A kept neighbor contributes an edge
/// (weight = center-to-center distance) only if it is not occupied and the
/// line-of-sight oracle reports the segment between the two centers clear.
///
/// Selection is per-leaf and not symmetrized: A may pick B while B does
/// not pick A, and every accepted pick still inserts the edge in both
/// directions. The returned map carries, per source cell, the number of
/// picks it accepted; the planner uses it to validate path endpoints.
pub fn build_graph<L: LineOfSightOracle>(
    octree: &Octree,
    config: &GraphConfig,
    los: &L,
) -> Result<(SceneGraph, HashMap<String, usize>), NavError> {
    let mut graph = SceneGraph::default();
    let mut outgoing_edges = HashMap::new();

    for cell in octree.all_cells(true) {
        let mut neighbors: Vec<(&Cell, f64)> = octree
            .neighbors_within(cell, config.distance_threshold)?
            .into_iter()
            .map(|n| (n, cell.center.distance(n.center)))
            .collect();
        neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));
        neighbors.truncate(config.top_k_neighbors);

        let mut added = 0usize;
        for (neighbor, weight) in neighbors {
            // Never path into an occupied cell.
            if neighbor.occupancy == Occupancy::Occupied {
                continue;
            }
            if los
                .is_blocked(cell.center, neighbor.center)
                .map_err(NavError::Oracle)?
            {
                continue;
            }
            graph.add_edge(cell, neighbor, weight);
            added += 1;
        }
        outgoing_edges.insert(cell.id.clone(), added);
    }

    Ok((graph, outgoing_edges))
}
