//! Error kinds surfaced by the navigation core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    /// Re-subdividing a cell that already has children. Programmer error.
    #[error("cell {0} is already subdivided")]
    AlreadySubdivided(String),

    /// No leaf cells inside the distance threshold. Recoverable: retry with
    /// a wider threshold or accept a sparser graph.
    #[error(
        "no neighbors within {threshold} of cell {cell_id}; the distance threshold is too small for the cell density at this depth"
    )]
    NoNeighbors { cell_id: String, threshold: f64 },

    /// A path endpoint resolved to a cell with zero outgoing edges, so no
    /// path through it can exist. Surfaced before the search begins.
    #[error("cell {0} has no outgoing edges and cannot serve as a path endpoint")]
    DisconnectedEndpoint(String),

    /// An occupancy or line-of-sight oracle call failed.
    #[error("oracle query failed: {0:#}")]
    Oracle(anyhow::Error),
}
