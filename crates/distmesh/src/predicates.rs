//! Geometric predicates and checked delegation to caller-supplied functions.
//!
//! Shape-specific distance formulas live in `functional::shapes`; this module
//! only tests membership against explicit polygons and wraps function
//! evaluation with shape/finiteness checks used during input validation.

use nalgebra::{DMatrix, DVector};

use crate::error::MeshError;
use crate::functional::Evaluable;

/// Crossing-number test of each point against a closed polygon.
///
/// `points` is `(N, 2)`, `polygon` is `(V, 2)` with vertices in order (either
/// orientation; the closing edge is implicit).
///
/// On-edge membership is implementation-defined: an edge is counted when
/// exactly one endpoint lies strictly above the query's y (half-open rule), so
/// points on bottom/left edges tend to test inside and points on top/right
/// edges outside. Callers needing a specific tie-break must not rely on this.
///
/// Planar only: if either matrix has fewer than two columns every point tests
/// outside.
pub fn points_inside_polygon(points: &DMatrix<f64>, polygon: &DMatrix<f64>) -> Vec<bool> {
    if points.ncols() < 2 || polygon.ncols() < 2 {
        return vec![false; points.nrows()];
    }
    let v = polygon.nrows();
    (0..points.nrows())
        .map(|r| {
            let (px, py) = (points[(r, 0)], points[(r, 1)]);
            let mut inside = false;
            let mut j = v.wrapping_sub(1);
            for i in 0..v {
                let (xi, yi) = (polygon[(i, 0)], polygon[(i, 1)]);
                let (xj, yj) = (polygon[(j, 0)], polygon[(j, 1)]);
                if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
            inside
        })
        .collect()
}

/// Evaluate `f` at `points` and check one finite value per row.
pub fn evaluate<F: Evaluable + ?Sized>(
    f: &F,
    points: &DMatrix<f64>,
    what: &'static str,
) -> Result<DVector<f64>, MeshError> {
    let values = f.eval(points);
    if values.len() != points.nrows() {
        return Err(MeshError::FunctionShape {
            what,
            expected: points.nrows(),
            got: values.len(),
        });
    }
    if values.iter().any(|x| !x.is_finite()) {
        return Err(MeshError::NonFinite { what });
    }
    Ok(values)
}

/// Centroid of every simplex, `(M, D)`.
pub fn centroids(points: &DMatrix<f64>, simplices: &DMatrix<usize>) -> DMatrix<f64> {
    let k = simplices.ncols() as f64;
    DMatrix::from_fn(simplices.nrows(), points.ncols(), |s, d| {
        simplices.row(s).iter().map(|&i| points[(i, d)]).sum::<f64>() / k
    })
}

/// Rows of `points` whose mask entry is true.
pub fn select_rows(points: &DMatrix<f64>, mask: &[bool]) -> DMatrix<f64> {
    let idx: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect();
    gather(points, &idx)
}

/// Rows of `points` at `indices`, in that order.
pub fn gather(points: &DMatrix<f64>, indices: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(indices.len(), points.ncols(), |r, c| points[(indices[r], c)])
}
