//! Error types for mesh generation and the triangulation back-ends.
//!
//! - `MeshError`: input-contract violations (reported before any iteration)
//!   and fatal conditions during a run.
//! - `TriangulationError`: failures of the external Delaunay primitive. Fatal
//!   for the initial triangulation; a later rejection keeps the previous
//!   simplices.
//!
//! Degenerate numerics inside the relaxation loop (zero-length edges, flat
//! gradients) are not errors; they are neutralized locally.

use thiserror::Error;

/// Fatal errors of a mesh-generation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("characteristic edge length must be finite and > 0, got {h0}")]
    InvalidEdgeLength { h0: f64 },

    #[error("malformed bounding box: {reason}")]
    MalformedBoundingBox { reason: String },

    #[error("dimension mismatch for {what}: expected {expected} columns, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("fixed point {index} lies outside the domain (distance {distance} > {tolerance})")]
    FixedPointOutside {
        index: usize,
        distance: f64,
        tolerance: f64,
    },

    #[error("{what} returned {got} values for {expected} points")]
    FunctionShape {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{what} returned a non-finite value")]
    NonFinite { what: &'static str },

    #[error("invalid subset size: k={k} for n={n} (need 1 <= k <= n)")]
    InvalidSubsetSize { n: usize, k: usize },

    #[error("invalid mesh configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("seeding produced {got} points, need at least {needed}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),

    #[error("no simplex survived the centroid filter")]
    EmptyMesh,
}

/// Failures of a `Triangulator`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriangulationError {
    #[error("need at least {needed} points to triangulate in {dim}D, got {got}")]
    InsufficientPoints {
        dim: usize,
        needed: usize,
        got: usize,
    },

    #[error("{backend} does not support {dim}D input")]
    UnsupportedDimension { backend: &'static str, dim: usize },

    #[error("degenerate point set: {reason}")]
    Degenerate { reason: String },

    #[error("triangulation backend rejected the input: {reason}")]
    Rejected { reason: String },
}
