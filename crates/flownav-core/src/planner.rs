//! Shortest-path search over the scene graph.

use crate::error::NavError;
use crate::graph::SceneGraph;
use crate::octree::Octree;
use glam::DVec3;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone)]
struct OpenNode {
    id: String,
    g_score: FloatOrd,
    f_score: FloatOrd,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.g_score == other.g_score && self.f_score == other.f_score
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Find the cheapest path between the leaf cells nearest to `start` and
/// `end`, as an ordered sequence of cell ids including both endpoints.
///
/// An endpoint whose nearest leaf accepted no outgoing edges cannot
/// participate in any path; that precondition is checked before the search
/// begins and fails with [`NavError::DisconnectedEndpoint`]. A search that
/// exhausts the graph without reaching the goal returns an empty sequence:
/// endpoints in disconnected components are a normal outcome, not an error.
pub fn find_path(
    octree: &Octree,
    graph: &SceneGraph,
    outgoing_edges: &HashMap<String, usize>,
    start: DVec3,
    end: DVec3,
) -> Result<Vec<String>, NavError> {
    let start_cell = octree.closest_cell(start, true);
    let end_cell = octree.closest_cell(end, true);

    for cell in [start_cell, end_cell] {
        if outgoing_edges.get(&cell.id).copied().unwrap_or(0) == 0 {
            return Err(NavError::DisconnectedEndpoint(cell.id.clone()));
        }
    }

    Ok(astar(graph, &start_cell.id, &end_cell.id))
}

/// A* with the straight-line distance heuristic, which is admissible here
/// because edge weights are the same Euclidean distances. Ties resolve on
/// (f, g, id), so equal-cost graphs reproduce the same path every run.
fn astar(graph: &SceneGraph, start_id: &str, goal_id: &str) -> Vec<String> {
    if start_id == goal_id {
        return vec![start_id.to_string()];
    }
    let Some(goal_center) = graph.center(goal_id) else {
        return Vec::new();
    };
    let heuristic = |id: &str| {
        graph
            .center(id)
            .map(|c| c.distance(goal_center))
            .unwrap_or(0.0)
    };

    let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    let mut g_score: HashMap<String, f64> = HashMap::new();
    let mut came_from: HashMap<String, String> = HashMap::new();
    let mut closed_set: HashSet<String> = HashSet::new();

    g_score.insert(start_id.to_string(), 0.0);
    open_set.push(Reverse(OpenNode {
        id: start_id.to_string(),
        g_score: FloatOrd(0.0),
        f_score: FloatOrd(heuristic(start_id)),
    }));

    while let Some(Reverse(current)) = open_set.pop() {
        if closed_set.contains(&current.id) {
            continue;
        }
        let best_g = g_score.get(&current.id).copied().unwrap_or(f64::INFINITY);
        if current.g_score.0 > best_g + 1e-9 {
            continue;
        }

        if current.id == goal_id {
            return reconstruct(&came_from, &current.id);
        }
        closed_set.insert(current.id.clone());

        for (neighbor, weight) in graph.neighbors(&current.id) {
            if closed_set.contains(neighbor) {
                continue;
            }
            let tentative = best_g + weight;
            if tentative < g_score.get(neighbor).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(neighbor.to_string(), current.id.clone());
                g_score.insert(neighbor.to_string(), tentative);
                open_set.push(Reverse(OpenNode {
                    id: neighbor.to_string(),
                    g_score: FloatOrd(tentative),
                    f_score: FloatOrd(tentative + heuristic(neighbor)),
                }));
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<String, String>, goal: &str) -> Vec<String> {
    let mut path = vec![goal.to_string()];
    let mut current = goal;
    while let Some(previous) = came_from.get(current) {
        path.push(previous.clone());
        current = previous;
    }
    path.reverse();
    path
}

/// Local-avoidance pass over the desired flow vector, applied every control
/// cycle between the flow-field lookup and actuation.
///
/// Placeholder for a reciprocal velocity-obstacle method; for now the
/// desired vector passes through unchanged.
pub fn local_avoidance(desired: DVec3) -> DVec3 {
    desired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, GraphConfig};
    use crate::oracle::LineOfSightOracle;

    struct ClearSight;

    impl LineOfSightOracle for ClearSight {
        fn is_blocked(&self, _a: DVec3, _b: DVec3) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    /// Blocks any sight line longer than the given span.
    struct MaxRange(f64);

    impl LineOfSightOracle for MaxRange {
        fn is_blocked(&self, a: DVec3, b: DVec3) -> anyhow::Result<bool> {
            Ok(a.distance(b) > self.0)
        }
    }

    /// Blocks sight between the two halves of the volume split at x = 0.
    struct WallAtX0;

    impl LineOfSightOracle for WallAtX0 {
        fn is_blocked(&self, a: DVec3, b: DVec3) -> anyhow::Result<bool> {
            Ok(a.x.signum() != b.x.signum())
        }
    }

    struct BlockAll;

    impl LineOfSightOracle for BlockAll {
        fn is_blocked(&self, _a: DVec3, _b: DVec3) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    fn depth_one_tree() -> Octree {
        let mut tree = Octree::new(DVec3::ZERO, 10.0, 1);
        tree.cell_by_id_mut("root").unwrap().subdivide().unwrap();
        tree
    }

    fn depth_two_tree() -> Octree {
        let mut tree = Octree::new(DVec3::ZERO, 10.0, 2);
        tree.cell_by_id_mut("root").unwrap().subdivide().unwrap();
        for i in 0..8 {
            tree.cell_by_id_mut(&format!("root-{i}"))
                .unwrap()
                .subdivide()
                .unwrap();
        }
        tree
    }

    fn config(threshold: f64, top_k: usize) -> GraphConfig {
        GraphConfig {
            distance_threshold: threshold,
            top_k_neighbors: top_k,
        }
    }

    fn path_cost(tree: &Octree, path: &[String]) -> f64 {
        path.windows(2)
            .map(|pair| {
                let a = tree.cell_by_id(&pair[0]).unwrap().center;
                let b = tree.cell_by_id(&pair[1]).unwrap().center;
                a.distance(b)
            })
            .sum()
    }

    #[test]
    fn finds_the_minimum_cost_route() {
        let tree = depth_one_tree();
        // Corner-to-corner diagonals (5√3) are out of sight range; the
        // cheapest remaining route is one face hop plus one edge diagonal.
        let (graph, outgoing) = build_graph(&tree, &config(100.0, 999), &MaxRange(8.0)).unwrap();

        let path = find_path(
            &tree,
            &graph,
            &outgoing,
            DVec3::new(-2.5, -2.5, -2.5),
            DVec3::new(2.5, 2.5, 2.5),
        )
        .unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(path.first().map(String::as_str), Some("root-0"));
        assert_eq!(path.last().map(String::as_str), Some("root-7"));
        let expected = 5.0 + 50.0_f64.sqrt();
        assert!((path_cost(&tree, &path) - expected).abs() < 1e-9);
    }

    #[test]
    fn corner_to_corner_on_a_subdivided_grid_is_deterministic() {
        let tree = depth_two_tree();
        assert_eq!(tree.all_cells(false).len(), 73);

        // Threshold 3 keeps only face-adjacent leaves (spacing 2.5), so the
        // route must walk the full Manhattan distance of the 4x4x4 grid.
        let (graph, outgoing) = build_graph(&tree, &config(3.0, 6), &ClearSight).unwrap();
        let start = DVec3::new(-3.75, -3.75, -3.75);
        let end = DVec3::new(3.75, 3.75, 3.75);

        let first = find_path(&tree, &graph, &outgoing, start, end).unwrap();
        let second = find_path(&tree, &graph, &outgoing, start, end).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
        assert!((path_cost(&tree, &first) - 22.5).abs() < 1e-9);
        assert_eq!(first.first().map(String::as_str), Some("root-0-0"));
        assert_eq!(first.last().map(String::as_str), Some("root-7-7"));
    }

    #[test]
    fn start_and_end_in_the_same_cell_is_a_single_node_path() {
        let tree = depth_one_tree();
        let (graph, outgoing) = build_graph(&tree, &config(100.0, 999), &ClearSight).unwrap();

        let path = find_path(
            &tree,
            &graph,
            &outgoing,
            DVec3::new(2.0, 2.0, 2.0),
            DVec3::new(3.0, 3.0, 3.0),
        )
        .unwrap();
        assert_eq!(path, vec!["root-7".to_string()]);
    }

    #[test]
    fn disconnected_components_yield_an_empty_path() {
        let tree = depth_one_tree();
        // Both halves stay internally connected, so the endpoints pass the
        // outgoing-edge precondition; no edge crosses between them.
        let (graph, outgoing) = build_graph(&tree, &config(100.0, 999), &WallAtX0).unwrap();

        let path = find_path(
            &tree,
            &graph,
            &outgoing,
            DVec3::new(-2.5, -2.5, -2.5),
            DVec3::new(2.5, 2.5, 2.5),
        )
        .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn edge_less_endpoints_fail_the_precondition() {
        let tree = depth_one_tree();
        let (graph, outgoing) = build_graph(&tree, &config(100.0, 999), &BlockAll).unwrap();

        let result = find_path(
            &tree,
            &graph,
            &outgoing,
            DVec3::new(-2.5, -2.5, -2.5),
            DVec3::new(2.5, 2.5, 2.5),
        );
        assert!(matches!(result, Err(NavError::DisconnectedEndpoint(_))));
    }

    #[test]
    fn local_avoidance_is_a_pass_through() {
        let desired = DVec3::new(1.0, -2.0, 0.5);
        assert_eq!(local_avoidance(desired), desired);
    }
}
