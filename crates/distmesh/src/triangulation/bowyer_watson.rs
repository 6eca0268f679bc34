//! Dimension-generic Bowyer–Watson with visibility-repaired cavities.
//!
//! Model
//! - Points are mapped to the unit box around their centre and nudged by a
//!   deterministic per-coordinate jitter, so regular lattices are not exactly
//!   cospherical. The jitter is a pure function of (row, axis).
//! - A super-simplex far outside the unit box seeds the triangulation; cells
//!   touching its vertices are stripped at the end.
//! - Each cell caches its circumsphere. Insertion collects the cells whose
//!   sphere strictly contains the new point (the cavity).
//! - Cavity repair: every boundary facet must see the new point strictly on
//!   the same side as the cavity cell behind it. A facet that fails pulls its
//!   outside neighbour into the cavity, and the check repeats. This keeps the
//!   new cells positively oriented when round-off makes the sphere test
//!   inconsistent.
//!
//! Cost is O(N · cells) per call. `Delaunay` routes 3D to 5D to the
//! `delaunay` crate and uses this back-end for 1D, above 5D, and as fallback.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{DMatrix, DVector};

use super::{check_input, Triangulator, RANK_TOLERANCE};
use crate::error::TriangulationError;

/// Relative jitter applied to normalized coordinates.
pub const DEFAULT_JITTER: f64 = 1e-8;
/// Super-simplex size relative to the unit box.
const SUPER_SCALE: f64 = 100.0;
/// Minimum |orientation| for a new cell to count as non-degenerate.
const VISIBILITY_EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
pub struct BowyerWatson {
    pub jitter: f64,
}

impl Default for BowyerWatson {
    fn default() -> Self {
        Self {
            jitter: DEFAULT_JITTER,
        }
    }
}

struct Cell {
    /// Sorted vertex ids (super vertices are `n..n+D+1`).
    vertices: Vec<usize>,
    center: DVector<f64>,
    radius2: f64,
}

/// SplitMix64 finalizer.
#[inline]
fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// Deterministic value in [-1, 1) for (row, axis).
#[inline]
fn unit_noise(row: usize, axis: usize) -> f64 {
    let h = mix((row as u64)
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(axis as u64 + 1));
    (h >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
}

/// Input rows mapped to the unit box and jittered, followed by the `D + 1`
/// super-simplex vertices.
fn normalized_with_super(points: &DMatrix<f64>, jitter: f64) -> Vec<DVector<f64>> {
    let (n, dim) = points.shape();
    let lo: Vec<f64> = (0..dim).map(|k| points.column(k).min()).collect();
    let hi: Vec<f64> = (0..dim).map(|k| points.column(k).max()).collect();
    let half = (0..dim)
        .map(|k| (hi[k] - lo[k]) / 2.0)
        .fold(f64::MIN_POSITIVE, f64::max);

    let mut out: Vec<DVector<f64>> = (0..n)
        .map(|i| {
            DVector::from_fn(dim, |k, _| {
                let c = (lo[k] + hi[k]) / 2.0;
                (points[(i, k)] - c) / half + jitter * unit_noise(i, k)
            })
        })
        .collect();

    let a = SUPER_SCALE;
    let b = SUPER_SCALE * dim as f64 + (dim as f64 - 1.0) * a;
    out.push(DVector::from_element(dim, -a));
    for axis in 0..dim {
        out.push(DVector::from_fn(dim, |k, _| if k == axis { b } else { -a }));
    }
    out
}

fn circumsphere(pts: &[DVector<f64>], vertices: &[usize]) -> Option<(DVector<f64>, f64)> {
    let p0 = &pts[vertices[0]];
    let dim = p0.len();
    let a = DMatrix::from_fn(dim, dim, |i, k| pts[vertices[i + 1]][k] - p0[k]);
    let b = DVector::from_fn(dim, |i, _| 0.5 * (&pts[vertices[i + 1]] - p0).norm_squared());
    let x = a.lu().solve(&b)?;
    if !x.iter().all(|v| v.is_finite()) {
        return None;
    }
    let radius2 = x.norm_squared();
    Some((p0 + x, radius2))
}

/// Signed volume (× D!) of the simplex `facet + apex`.
fn orientation(pts: &[DVector<f64>], facet: &[usize], apex: usize) -> f64 {
    let p0 = &pts[facet[0]];
    let dim = p0.len();
    DMatrix::from_fn(dim, dim, |i, k| {
        let v = if i + 1 < facet.len() { facet[i + 1] } else { apex };
        pts[v][k] - p0[k]
    })
    .determinant()
}

fn make_cell(pts: &[DVector<f64>], mut vertices: Vec<usize>) -> Result<Cell, TriangulationError> {
    vertices.sort_unstable();
    let (center, radius2) =
        circumsphere(pts, &vertices).ok_or_else(|| TriangulationError::Degenerate {
            reason: format!("flat simplex {vertices:?} has no circumsphere"),
        })?;
    Ok(Cell {
        vertices,
        center,
        radius2,
    })
}

/// Facets of the cavity cells mapped to the vertices opposite them.
/// A facet listed once is on the cavity boundary.
fn cavity_shell(cells: &[Cell], cavity: &BTreeSet<usize>) -> BTreeMap<Vec<usize>, Vec<usize>> {
    let mut shell: BTreeMap<Vec<usize>, Vec<usize>> = BTreeMap::new();
    for cell in cavity.iter().map(|&id| &cells[id]) {
        for j in 0..cell.vertices.len() {
            let mut facet = cell.vertices.clone();
            let opposite = facet.remove(j);
            shell.entry(facet).or_default().push(opposite);
        }
    }
    shell
}

/// Whether `point` lies strictly on the same side of `facet` as `opposite`.
fn same_side(pts: &[DVector<f64>], facet: &[usize], opposite: usize, point: usize) -> bool {
    let inner = orientation(pts, facet, opposite);
    let outer = orientation(pts, facet, point);
    inner * outer > 0.0 && outer.abs() > VISIBILITY_EPS
}

/// Reject inputs whose points span less than D dimensions.
fn check_full_rank(pts: &[DVector<f64>], n: usize, dim: usize) -> Result<(), TriangulationError> {
    let centered = DMatrix::from_fn(n, dim, |i, k| pts[i][k] - pts[0][k]);
    let sv = centered.singular_values();
    let max = sv.max();
    let rank = sv.iter().filter(|&&s| s > RANK_TOLERANCE * max).count();
    if rank < dim {
        return Err(TriangulationError::Degenerate {
            reason: format!("points span {rank} of {dim} dimensions"),
        });
    }
    Ok(())
}

impl Triangulator for BowyerWatson {
    fn triangulate(&self, points: &DMatrix<f64>) -> Result<DMatrix<usize>, TriangulationError> {
        check_input(points, "bowyer-watson")?;
        let (n, dim) = points.shape();
        check_full_rank(&normalized_with_super(points, 0.0), n, dim)?;
        let pts = normalized_with_super(points, self.jitter);

        let mut cells: Vec<Cell> = vec![make_cell(&pts, (n..n + dim + 1).collect())?];
        for i in 0..n {
            let p = &pts[i];
            let mut cavity: BTreeSet<usize> = cells
                .iter()
                .enumerate()
                .filter(|(_, c)| (p - &c.center).norm_squared() < c.radius2)
                .map(|(id, _)| id)
                .collect();
            if cavity.is_empty() {
                return Err(TriangulationError::Degenerate {
                    reason: format!("point {i} lies in no circumsphere"),
                });
            }

            let shell = loop {
                let shell = cavity_shell(&cells, &cavity);
                let hidden = shell
                    .iter()
                    .find(|(facet, opp)| opp.len() == 1 && !same_side(&pts, facet, opp[0], i))
                    .map(|(facet, _)| facet.clone());
                let Some(facet) = hidden else {
                    break shell;
                };
                let neighbour = cells
                    .iter()
                    .enumerate()
                    .find(|(id, c)| {
                        !cavity.contains(id) && facet.iter().all(|v| c.vertices.contains(v))
                    })
                    .map(|(id, _)| id)
                    .ok_or_else(|| TriangulationError::Degenerate {
                        reason: format!("cannot repair cavity of point {i}"),
                    })?;
                cavity.insert(neighbour);
            };

            let mut id = 0;
            cells.retain(|_| {
                id += 1;
                !cavity.contains(&(id - 1))
            });
            for (facet, opp) in shell {
                if opp.len() == 1 {
                    let mut vertices = facet;
                    vertices.push(i);
                    cells.push(make_cell(&pts, vertices)?);
                }
            }
        }

        let real: Vec<&Vec<usize>> = cells
            .iter()
            .map(|c| &c.vertices)
            .filter(|v| v.iter().all(|&id| id < n))
            .collect();
        if real.is_empty() {
            return Err(TriangulationError::Degenerate {
                reason: "no simplex spans only input points".into(),
            });
        }
        Ok(DMatrix::from_fn(real.len(), dim + 1, |r, c| real[r][c]))
    }
}
