//! External oracle contracts consumed by the core.
//!
//! The actual geometry tests live in the host application (or a simulated
//! scene); the core relies only on these signatures. Answers may be cached
//! by the caller: a cell is never re-queried once its occupancy is known.

use anyhow::Result;
use glam::DVec3;

/// Answers whether a cubic region intersects obstacle geometry.
pub trait OccupancyOracle {
    fn is_occupied(&self, center: DVec3, size: f64) -> Result<bool>;
}

/// Answers whether the straight segment between two points is obstructed.
/// Queried only during graph construction.
pub trait LineOfSightOracle {
    fn is_blocked(&self, a: DVec3, b: DVec3) -> Result<bool>;
}
