//! The relaxation engine: seeding, retriangulation and truss-force iteration.
//!
//! Per step
//! 1. Retriangulate when any point moved more than
//!    `retriangulation_tolerance * h0` since the last triangulation. Simplices
//!    whose centroid is not safely inside (`fd < -geometry_tolerance * h0`)
//!    are dropped and the edge set is rebuilt. Only the first triangulation
//!    is fatal on failure; later failures keep the previous simplices.
//! 2. Edge forces: desired lengths are `fh(midpoint)` scaled by the length bias
//!    and the global mass ratio `(ΣL^D / Σh^D)^(1/D)`; the force is
//!    `max(L0 - L, 0) / L` (repulsive only).
//! 3. Explicit Euler move; the fixed-point prefix never moves.
//! 4. One projection step for points that left the domain.
//! 5. Converged when the largest move is below
//!    `point_movement_tolerance * h0`; the iteration cap ends the run as
//!    `IterationCapReached`.

mod engine;
mod types;

pub use engine::{bounding_box, distmesh, distmesh_with, MeshGenerator};
pub use types::{Mesh, RelaxState, Termination};
