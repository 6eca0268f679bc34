//! Initial point distribution: lattice fill plus rejection sampling.
//!
//! Pipeline
//! - Fill the bounding box with a regular lattice at spacing `h0`
//!   (staggered rows in 2D, Cartesian otherwise).
//! - Keep lattice points with `fd(p) < geometry_tolerance * h0`.
//! - Drop lattice points coincident with a fixed point.
//! - Accept each remaining point with probability `(1/fh(p))^D / max(...)`.
//! - Output: fixed points first (in caller order), accepted points after.
//!
//! The acceptance draw is the only randomized step of a run; pass a seeded
//! `StdRng` for reproducible meshes.

use nalgebra::DMatrix;
use rand::Rng;

use crate::cfg::MeshCfg;
use crate::error::MeshError;
use crate::functional::Evaluable;
use crate::predicates::{evaluate, gather};

/// Coordinates closer than this (× h0) on every axis count as the same point.
const COINCIDENCE_TOLERANCE: f64 = 1e-12;

/// Number of lattice nodes `lo, lo + h, …` not exceeding `hi`.
fn axis_count(lo: f64, hi: f64, h: f64) -> usize {
    // slack keeps hi itself when (hi - lo) / h rounds just below an integer
    1 + ((hi - lo) / h + 1e-10).floor().max(0.0) as usize
}

/// Regular lattice covering `bbox` (`(2, D)`) at spacing `h0`.
///
/// In 2D rows are `h0·√3/2` apart and every odd row is shifted by `h0/2`,
/// giving near-equilateral triangles. Other dimensions use a Cartesian grid.
pub fn lattice(bbox: &DMatrix<f64>, h0: f64) -> DMatrix<f64> {
    let dim = bbox.ncols();
    if dim == 2 {
        let dy = h0 * 3f64.sqrt() / 2.0;
        let nx = axis_count(bbox[(0, 0)], bbox[(1, 0)], h0);
        let ny = axis_count(bbox[(0, 1)], bbox[(1, 1)], dy);
        return DMatrix::from_fn(nx * ny, 2, |r, c| {
            let (row, col) = (r / nx, r % nx);
            if c == 0 {
                let shift = if row % 2 == 1 { h0 / 2.0 } else { 0.0 };
                bbox[(0, 0)] + col as f64 * h0 + shift
            } else {
                bbox[(0, 1)] + row as f64 * dy
            }
        });
    }

    let counts: Vec<usize> = (0..dim)
        .map(|k| axis_count(bbox[(0, k)], bbox[(1, k)], h0))
        .collect();
    let total: usize = counts.iter().product();
    DMatrix::from_fn(total, dim, |r, c| {
        // mixed-radix decode, first axis fastest
        let stride: usize = counts[..c].iter().product();
        let i = (r / stride) % counts[c];
        bbox[(0, c)] + i as f64 * h0
    })
}

fn coincides(points: &DMatrix<f64>, r: usize, fixed: &DMatrix<f64>, f: usize, tol: f64) -> bool {
    (0..points.ncols()).all(|k| (points[(r, k)] - fixed[(f, k)]).abs() <= tol)
}

/// Seed the initial point set for a run.
///
/// Inputs are assumed validated (positive `h0`, well-formed `bbox`, `fixed`
/// with matching column count); function outputs are still checked.
pub fn create_point_list<D, H, R>(
    fd: &D,
    fh: &H,
    h0: f64,
    bbox: &DMatrix<f64>,
    fixed: &DMatrix<f64>,
    cfg: &MeshCfg,
    rng: &mut R,
) -> Result<DMatrix<f64>, MeshError>
where
    D: Evaluable + ?Sized,
    H: Evaluable + ?Sized,
    R: Rng,
{
    let dim = bbox.ncols();
    let grid = lattice(bbox, h0);

    let d = evaluate(fd, &grid, "distance function")?;
    let limit = cfg.geometry_tolerance * h0;
    let tol = COINCIDENCE_TOLERANCE * h0;
    let candidates: Vec<usize> = (0..grid.nrows())
        .filter(|&r| d[r] < limit)
        .filter(|&r| !(0..fixed.nrows()).any(|f| coincides(&grid, r, fixed, f, tol)))
        .collect();
    let inside = gather(&grid, &candidates);

    let sizes = evaluate(fh, &inside, "size function")?;
    let weights: Vec<f64> = sizes.iter().map(|s| s.powi(-(dim as i32))).collect();
    let max_weight = weights
        .iter()
        .copied()
        .filter(|w| w.is_finite())
        .fold(0.0, f64::max);
    let accepted: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter_map(|(i, &w)| {
            // non-positive or non-finite weights cannot be normalized; keep the point
            let p = if max_weight > 0.0 && w.is_finite() && w > 0.0 {
                w / max_weight
            } else {
                1.0
            };
            (rng.gen::<f64>() < p).then_some(i)
        })
        .collect();

    let f = fixed.nrows();
    let out = DMatrix::from_fn(f + accepted.len(), dim, |r, c| {
        if r < f {
            fixed[(r, c)]
        } else {
            inside[(accepted[r - f], c)]
        }
    });
    tracing::debug!(
        lattice = grid.nrows(),
        inside = inside.nrows(),
        accepted = accepted.len(),
        "seeded lattice"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::{circular, rectangular, uniform};
    use nalgebra::{dmatrix, DVector};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_box() -> DMatrix<f64> {
        dmatrix![-1.0, -1.0; 1.0, 1.0]
    }

    #[test]
    fn hex_lattice_rows_are_staggered() {
        let g = lattice(&unit_box(), 0.5);
        // 5 columns, rows every 0.433 → 5 rows
        assert_eq!(g.nrows(), 25);
        assert!((g[(0, 0)] + 1.0).abs() < 1e-12);
        assert!((g[(5, 0)] + 0.75).abs() < 1e-12);
        assert!((g[(5, 1)] - (-1.0 + 0.25 * 3f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn cartesian_lattice_in_three_dimensions() {
        let bbox = dmatrix![0.0, 0.0, 0.0; 1.0, 1.0, 1.0];
        let g = lattice(&bbox, 0.5);
        assert_eq!(g.nrows(), 27);
        assert_eq!(g.ncols(), 3);
        assert_eq!(g.row(1).iter().copied().collect::<Vec<_>>(), vec![0.5, 0.0, 0.0]);
        assert_eq!(g.row(26).iter().copied().collect::<Vec<_>>(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn unit_disk_count_matches_hex_packing() {
        let mut rng = StdRng::seed_from_u64(7);
        let cfg = MeshCfg::default();
        let p = create_point_list(
            &circular(1.0, None),
            &uniform(),
            0.2,
            &unit_box(),
            &DMatrix::zeros(0, 2),
            &cfg,
            &mut rng,
        )
        .unwrap();
        let expected = 2.0 * std::f64::consts::PI / (3f64.sqrt() * 0.04);
        let n = p.nrows() as f64;
        assert!((n - expected).abs() / expected < 0.15, "got {n} points");
        let d = circular(1.0, None).eval(&p);
        assert!(d.iter().all(|&x| x < 1e-3 * 0.2));
    }

    #[test]
    fn uniform_size_accepts_independent_of_seed() {
        let cfg = MeshCfg::default();
        let run = |seed| {
            create_point_list(
                &circular(1.0, None),
                &uniform(),
                0.2,
                &unit_box(),
                &DMatrix::zeros(0, 2),
                &cfg,
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap()
        };
        assert_eq!(run(1), run(2));
    }

    #[test]
    fn fixed_points_come_first_and_are_not_duplicated() {
        let fixed = dmatrix![-1.0, -1.0; 1.0, -1.0; 1.0, 1.0; -1.0, 1.0];
        let mut rng = StdRng::seed_from_u64(0);
        let p = create_point_list(
            &rectangular(&unit_box()),
            &uniform(),
            0.5,
            &unit_box(),
            &fixed,
            &MeshCfg::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(p.rows(0, 4).into_owned(), fixed);
        // (-1, -1) is also a lattice node; it must appear exactly once
        let hits = (0..p.nrows())
            .filter(|&r| p[(r, 0)] == -1.0 && p[(r, 1)] == -1.0)
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn graded_size_thins_coarse_regions() {
        let cfg = MeshCfg::default();
        let graded = 0.05 + 0.3 * circular(0.0, None);
        let mut rng = StdRng::seed_from_u64(11);
        let fd = circular(1.0, None);
        let empty = DMatrix::zeros(0, 2);
        let sparse =
            create_point_list(&fd, &graded, 0.1, &unit_box(), &empty, &cfg, &mut rng).unwrap();
        let dense =
            create_point_list(&fd, &uniform(), 0.1, &unit_box(), &empty, &cfg, &mut rng).unwrap();
        assert!(sparse.nrows() * 3 < dense.nrows());

        let again = create_point_list(
            &fd,
            &graded,
            0.1,
            &unit_box(),
            &empty,
            &cfg,
            &mut StdRng::seed_from_u64(11),
        )
        .unwrap();
        assert_eq!(sparse, again);
    }

    #[test]
    fn size_function_shape_is_checked() {
        let bad = |_: &DMatrix<f64>| DVector::from_element(1, 1.0);
        let err = create_point_list(
            &circular(1.0, None),
            &bad,
            0.2,
            &unit_box(),
            &DMatrix::zeros(0, 2),
            &MeshCfg::default(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(matches!(err, MeshError::FunctionShape { what: "size function", .. }));
    }
}
