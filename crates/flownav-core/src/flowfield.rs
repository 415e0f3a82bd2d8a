//! Flow-field population: a per-cell direction toward a fixed destination.

use crate::error::NavError;
use crate::graph::{build_graph, GraphConfig};
use crate::octree::Octree;
use crate::oracle::LineOfSightOracle;
use crate::planner::find_path;
use glam::DVec3;

/// Populate every cell's flow vector for the given destination.
///
/// The graph is built once. Every cell — ancestors included, even though
/// only leaves are queried at runtime — then plans a path from its own
/// center and stores the direction to the second node of that path, taken
/// component-wise and not normalized. Cells whose path has fewer than two
/// nodes (already at the destination, or in a disconnected component) keep
/// the zero vector.
///
/// This sweep is O(cells x pathfind) and runs once per destination,
/// offline. Vectors go stale if the destination or the geometry changes;
/// nothing invalidates them automatically, the caller rebuilds instead.
pub fn populate_flow_field<L: LineOfSightOracle>(
    octree: &mut Octree,
    destination: DVec3,
    config: &GraphConfig,
    los: &L,
) -> Result<(), NavError> {
    let (graph, outgoing_edges) = build_graph(octree, config, los)?;

    // An edge-less destination would fail every request; surface it once,
    // up front, instead of 'succeeding' with an all-zero field.
    let destination_id = octree.closest_cell(destination, true).id.clone();
    if outgoing_edges
        .get(&destination_id)
        .copied()
        .unwrap_or(0)
        == 0
    {
        return Err(NavError::DisconnectedEndpoint(destination_id));
    }

    // Phase one: plan against the immutable tree.
    let mut vectors: Vec<(String, DVec3)> = Vec::new();
    for cell in octree.all_cells(false) {
        let path = match find_path(octree, &graph, &outgoing_edges, cell.center, destination) {
            Ok(path) => path,
            // Enclosed cells resolve to edge-less leaves. The sweep covers
            // every cell, so those simply carry no flow.
            Err(NavError::DisconnectedEndpoint(_)) => Vec::new(),
            Err(err) => return Err(err),
        };

        let vector = if path.len() > 1 {
            match octree.cell_by_id(&path[1]) {
                Some(next_cell) => next_cell.center - cell.center,
                None => DVec3::ZERO,
            }
        } else {
            DVec3::ZERO
        };
        vectors.push((cell.id.clone(), vector));
    }

    // Phase two: write the results back.
    for (id, vector) in vectors {
        if let Some(cell) = octree.cell_by_id_mut(&id) {
            cell.vector = vector;
        }
    }
    Ok(())
}
