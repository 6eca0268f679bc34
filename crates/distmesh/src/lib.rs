//! Simplex mesh generation by truss relaxation (DistMesh).
//!
//! A domain is given implicitly by a level-set distance function (negative
//! inside) and the desired local edge length by a size function. The engine
//! seeds points on a lattice, then alternates Delaunay retriangulation,
//! spring-force motion and boundary projection until the points settle.
//!
//! Layout
//! - `relax`: the engine (`distmesh`, `MeshGenerator`, `Mesh`).
//! - `seed`, `edges`, `projection`, `predicates`, `combinatorics`: the
//!   dimension-generic building blocks the engine calls.
//! - `triangulation`: the `Triangulator` seam and its back-ends.
//! - `functional`: composable distance/size functions.
//! - `cfg`, `error`: tunables and error types.
//!
//! Works in any dimension ≥ 1; 2D triangulation goes through `spade`, 3D to 5D
//! through the `delaunay` crate, other dimensions through the built-in
//! Bowyer–Watson.

pub mod cfg;
pub mod combinatorics;
pub mod edges;
pub mod error;
pub mod functional;
pub mod predicates;
pub mod projection;
pub mod relax;
pub mod seed;
pub mod triangulation;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::MeshCfg;
pub use edges::{boundary_edges, unique_edges};
pub use error::{MeshError, TriangulationError};
pub use relax::{bounding_box, distmesh, distmesh_with, Mesh, MeshGenerator, RelaxState, Termination};

/// Common exports for callers building meshes.
pub mod prelude {
    pub use crate::cfg::MeshCfg;
    pub use crate::edges::{boundary_edges, unique_edges};
    pub use crate::error::{MeshError, TriangulationError};
    pub use crate::functional::{
        circular, elliptical, polygon, rectangular, uniform, Evaluable, Functional,
    };
    pub use crate::relax::{
        bounding_box, distmesh, distmesh_with, Mesh, MeshGenerator, RelaxState, Termination,
    };
    pub use crate::triangulation::{
        BowyerWatson, Delaunay, IncrementalDelaunay, SpadeDelaunay, Triangulator,
    };
    pub use nalgebra::{DMatrix, DVector};
}
