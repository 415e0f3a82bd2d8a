//! Core navigation logic: octree partitioning of a bounded volume,
//! conversion of leaf cells into a weighted navigability graph, shortest
//! path search, and flow-field precomputation toward a fixed destination.
//!
//! Everything here is synchronous and side-effect free except for calls
//! into the two external oracles (occupancy and line of sight), whose
//! answers are cached on the cells that asked for them.

pub mod error;
pub mod flowfield;
pub mod geometry;
pub mod graph;
pub mod octree;
pub mod oracle;
pub mod planner;
pub mod space;

pub use error::NavError;
pub use flowfield::populate_flow_field;
pub use graph::{build_graph, GraphConfig, SceneGraph};
pub use octree::{Cell, Occupancy, Octree};
pub use oracle::{LineOfSightOracle, OccupancyOracle};
pub use planner::{find_path, local_avoidance};
pub use space::{build_space, SpaceConfig};
