//! One Newton step toward the zero level set for points outside the domain.
//!
//! For every movable point with `fd(p) > 0` the gradient is estimated by
//! forward differences with step `sqrt(eps) * h0` per axis, and the point
//! moves by `-fd(p) * g / |g|^2`. A zero or non-finite `|g|^2` leaves the
//! point where it is; the next outer iteration gets another chance.

use nalgebra::DMatrix;

use crate::functional::Evaluable;
use crate::predicates::gather;

/// Finite-difference step relative to the characteristic length.
#[inline]
pub fn gradient_step(h0: f64) -> f64 {
    f64::EPSILON.sqrt() * h0
}

/// Project outside points of `points` back onto the boundary of `fd`.
///
/// Rows `0..fixed` are never touched. Returns the number of points moved.
/// Non-finite distance values are treated like a flat gradient and skipped.
pub fn project_points_to_boundary<F: Evaluable + ?Sized>(
    fd: &F,
    h0: f64,
    points: &mut DMatrix<f64>,
    fixed: usize,
) -> usize {
    let d = fd.eval(points);
    let outside: Vec<usize> = (fixed..points.nrows())
        .filter(|&r| d.get(r).is_some_and(|&v| v > 0.0 && v.is_finite()))
        .collect();
    if outside.is_empty() {
        return 0;
    }

    let base = gather(points, &outside);
    let dim = points.ncols();
    let step = gradient_step(h0);
    let mut grad = DMatrix::<f64>::zeros(outside.len(), dim);
    for k in 0..dim {
        let mut shifted = base.clone();
        shifted.column_mut(k).add_scalar_mut(step);
        let dk = fd.eval(&shifted);
        for (i, &r) in outside.iter().enumerate() {
            grad[(i, k)] = (dk[i] - d[r]) / step;
        }
    }

    let mut moved = 0;
    for (i, &r) in outside.iter().enumerate() {
        let norm2 = grad.row(i).norm_squared();
        if !(norm2.is_finite() && norm2 > 0.0) {
            continue;
        }
        let scale = d[r] / norm2;
        for k in 0..dim {
            points[(r, k)] -= scale * grad[(i, k)];
        }
        moved += 1;
    }
    moved
}
