//! Primitive distance functions and the uniform size function.
//!
//! All primitives are dimension-generic except `polygon` (2D only).

use nalgebra::{DMatrix, DVector};

use super::Functional;
use crate::predicates::points_inside_polygon;

/// Euclidean norm of each row of `p - midpoint` (midpoint defaults to origin).
fn row_norms(p: &DMatrix<f64>, midpoint: &[f64], scale: &[f64]) -> DVector<f64> {
    DVector::from_fn(p.nrows(), |r, _| {
        (0..p.ncols())
            .map(|k| {
                let m = midpoint.get(k).copied().unwrap_or(0.0);
                let s = scale.get(k).copied().unwrap_or(1.0);
                ((p[(r, k)] - m) / s).powi(2)
            })
            .sum::<f64>()
            .sqrt()
    })
}

/// Ball of `radius` around `midpoint` (origin if `None`); exact signed distance.
pub fn circular(radius: f64, midpoint: Option<&[f64]>) -> Functional {
    let mid = midpoint.map(<[f64]>::to_vec).unwrap_or_default();
    Functional::new(move |p| row_norms(p, &mid, &[]).add_scalar(-radius))
}

/// Axis-aligned ellipsoid with semi-axes `radii` (level set, not a true distance).
pub fn elliptical(radii: &[f64], midpoint: Option<&[f64]>) -> Functional {
    let radii = radii.to_vec();
    let mid = midpoint.map(<[f64]>::to_vec).unwrap_or_default();
    Functional::new(move |p| row_norms(p, &mid, &radii).add_scalar(-1.0))
}

/// Axis-aligned box given as `(2, D)`: row 0 minima, row 1 maxima.
///
/// Returns `-min_k min(x_k - lo_k, hi_k - x_k)`: exact inside, an
/// underestimate near outside corners.
pub fn rectangular(rectangle: &DMatrix<f64>) -> Functional {
    let rect = rectangle.clone();
    Functional::new(move |p| {
        DVector::from_fn(p.nrows(), |r, _| {
            let inner = (0..p.ncols().min(rect.ncols()))
                .map(|k| (p[(r, k)] - rect[(0, k)]).min(rect[(1, k)] - p[(r, k)]))
                .fold(f64::INFINITY, f64::min);
            -inner
        })
    })
}

/// Signed distance to a closed polygon `(V, 2)`.
///
/// Magnitude is the distance to the nearest edge; sign comes from
/// `points_inside_polygon`, so points exactly on an edge get distance 0 with
/// either sign. Inputs with fewer than two columns evaluate to NaN, which
/// `predicates::evaluate` reports as non-finite.
pub fn polygon(vertices: &DMatrix<f64>) -> Functional {
    let poly = vertices.clone();
    Functional::new(move |p| {
        if p.ncols() < 2 || poly.ncols() < 2 {
            return DVector::from_element(p.nrows(), f64::NAN);
        }
        let inside = points_inside_polygon(p, &poly);
        let v = poly.nrows();
        DVector::from_fn(p.nrows(), |r, _| {
            let (px, py) = (p[(r, 0)], p[(r, 1)]);
            let mut best = f64::INFINITY;
            let mut j = v.wrapping_sub(1);
            for i in 0..v {
                let (ax, ay) = (poly[(j, 0)], poly[(j, 1)]);
                let (bx, by) = (poly[(i, 0)], poly[(i, 1)]);
                best = best.min(segment_distance(px, py, ax, ay, bx, by));
                j = i;
            }
            if inside[r] {
                -best
            } else {
                best
            }
        })
    })
}

/// Distance from `(px, py)` to segment `a→b`.
fn segment_distance(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let (vx, vy) = (bx - ax, by - ay);
    let (wx, wy) = (px - ax, py - ay);
    let c1 = vx * wx + vy * wy;
    let c2 = vx * vx + vy * vy;
    let (qx, qy) = if c1 <= 0.0 || c2 <= 0.0 {
        (ax, ay)
    } else if c1 >= c2 {
        (bx, by)
    } else {
        let t = c1 / c2;
        (ax + t * vx, ay + t * vy)
    };
    ((px - qx).powi(2) + (py - qy).powi(2)).sqrt()
}

/// Size function requesting the same edge length everywhere.
pub fn uniform() -> Functional {
    Functional::constant(1.0)
}
