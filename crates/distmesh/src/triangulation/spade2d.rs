//! 2D Delaunay via `spade`.

use nalgebra::DMatrix;
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation};

use super::{check_input, Triangulator};
use crate::error::TriangulationError;

/// Coordinates below this magnitude are flushed to zero; spade rejects
/// subnormal-range values.
const FLUSH_TO_ZERO: f64 = 1e-30;

/// Vertex carrying its source row so faces map back to input indices.
#[derive(Clone, Copy, Debug)]
struct IndexedVertex {
    position: Point2<f64>,
    index: usize,
}

impl HasPosition for IndexedVertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Planar Delaunay triangulation backed by `spade`.
///
/// Exactly coincident input points are merged by spade; only one of their
/// row indices appears in the output.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpadeDelaunay;

impl Triangulator for SpadeDelaunay {
    fn triangulate(&self, points: &DMatrix<f64>) -> Result<DMatrix<usize>, TriangulationError> {
        if points.ncols() != 2 {
            return Err(TriangulationError::UnsupportedDimension {
                backend: "spade",
                dim: points.ncols(),
            });
        }
        check_input(points, "spade")?;

        let flush = |x: f64| if x.abs() < FLUSH_TO_ZERO { 0.0 } else { x };
        let vertices: Vec<IndexedVertex> = (0..points.nrows())
            .map(|i| IndexedVertex {
                position: Point2::new(flush(points[(i, 0)]), flush(points[(i, 1)])),
                index: i,
            })
            .collect();
        let dt = DelaunayTriangulation::<IndexedVertex>::bulk_load(vertices).map_err(|e| {
            TriangulationError::Rejected {
                reason: format!("{e:?}"),
            }
        })?;

        let faces: Vec<[usize; 3]> = dt
            .inner_faces()
            .map(|face| face.vertices().map(|v| v.data().index))
            .collect();
        if faces.is_empty() {
            return Err(TriangulationError::Degenerate {
                reason: "all points are collinear".into(),
            });
        }
        Ok(DMatrix::from_fn(faces.len(), 3, |r, c| faces[r][c]))
    }
}
