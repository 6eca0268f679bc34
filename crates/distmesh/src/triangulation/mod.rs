//! Delaunay triangulation back-ends.
//!
//! Purpose
//! - `Triangulator` is the seam between the relaxation engine and the
//!   external triangulation primitive: `(N, D)` points in, `(M, D+1)` simplex
//!   table out, indices referring to input rows.
//! - Each call builds and drops its own backend state, so independent runs can
//!   triangulate concurrently on separate threads.
//!
//! Back-ends
//! - `SpadeDelaunay`: 2D, wraps `spade::DelaunayTriangulation`.
//! - `IncrementalDelaunay`: 3D to 5D, wraps `delaunay::DelaunayTriangulation`.
//! - `BowyerWatson`: any dimension ≥ 1, incremental with cached circumspheres.
//! - `Delaunay`: spade for 2D, the `delaunay` crate for 3D to 5D with
//!   Bowyer–Watson as fallback, Bowyer–Watson otherwise.

pub mod bowyer_watson;
pub mod incremental;
pub mod spade2d;

use nalgebra::DMatrix;

use crate::error::TriangulationError;

pub use bowyer_watson::BowyerWatson;
pub use incremental::IncrementalDelaunay;
pub use spade2d::SpadeDelaunay;

/// Relative singular-value floor below which a point set is affinely degenerate.
pub(crate) const RANK_TOLERANCE: f64 = 1e-10;

/// Produces a Delaunay simplex table for a point set.
pub trait Triangulator {
    fn triangulate(&self, points: &DMatrix<f64>) -> Result<DMatrix<usize>, TriangulationError>;
}

/// Default back-end selection by dimension.
#[derive(Clone, Copy, Debug, Default)]
pub struct Delaunay {
    pub bowyer_watson: BowyerWatson,
}

impl Triangulator for Delaunay {
    fn triangulate(&self, points: &DMatrix<f64>) -> Result<DMatrix<usize>, TriangulationError> {
        let dim = points.ncols();
        if dim == 2 {
            return SpadeDelaunay.triangulate(points);
        }
        if IncrementalDelaunay::DIMENSIONS.contains(&dim) {
            match IncrementalDelaunay.triangulate(points) {
                Ok(table) => return Ok(table),
                Err(err) => {
                    tracing::debug!(dim, error = %err, "delaunay crate failed, using bowyer-watson");
                }
            }
        }
        self.bowyer_watson.triangulate(points)
    }
}

/// Shared input checks: positive dimension, at least `D + 1` finite points.
pub(crate) fn check_input(
    points: &DMatrix<f64>,
    backend: &'static str,
) -> Result<(), TriangulationError> {
    let (n, dim) = points.shape();
    if dim == 0 {
        return Err(TriangulationError::UnsupportedDimension { backend, dim });
    }
    if n < dim + 1 {
        return Err(TriangulationError::InsufficientPoints {
            dim,
            needed: dim + 1,
            got: n,
        });
    }
    if let Some(i) = points.iter().position(|x| !x.is_finite()) {
        return Err(TriangulationError::Rejected {
            reason: format!("non-finite coordinate in row {}", i % n),
        });
    }
    Ok(())
}
