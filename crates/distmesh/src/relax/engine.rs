use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::types::{Mesh, RelaxState, Termination};
use crate::cfg::{length_bias, MeshCfg};
use crate::edges::unique_edges;
use crate::error::MeshError;
use crate::functional::Evaluable;
use crate::predicates::{centroids, evaluate};
use crate::projection::project_points_to_boundary;
use crate::seed::create_point_list;
use crate::triangulation::{Delaunay, Triangulator};

/// The box `[-1, 1]^dim` as a `(2, dim)` matrix.
pub fn bounding_box(dim: usize) -> DMatrix<f64> {
    DMatrix::from_fn(2, dim, |r, _| if r == 0 { -1.0 } else { 1.0 })
}

/// Mesh the domain `fd < 0` with default settings and back-end.
pub fn distmesh(
    fd: &dyn Evaluable,
    fh: &dyn Evaluable,
    h0: f64,
    bbox: &DMatrix<f64>,
    fixed: &DMatrix<f64>,
) -> Result<Mesh, MeshError> {
    distmesh_with(fd, fh, h0, bbox, fixed, MeshCfg::default(), &Delaunay::default())
}

/// Mesh the domain `fd < 0` with explicit configuration and triangulator.
pub fn distmesh_with<T: Triangulator + ?Sized>(
    fd: &dyn Evaluable,
    fh: &dyn Evaluable,
    h0: f64,
    bbox: &DMatrix<f64>,
    fixed: &DMatrix<f64>,
    cfg: MeshCfg,
    triangulator: &T,
) -> Result<Mesh, MeshError> {
    MeshGenerator::new(fd, fh, h0, bbox, fixed, cfg, triangulator)?.run()
}

fn validate_bbox(bbox: &DMatrix<f64>) -> Result<usize, MeshError> {
    let malformed = |reason: String| Err(MeshError::MalformedBoundingBox { reason });
    if bbox.nrows() != 2 {
        return malformed(format!("expected 2 rows (min, max), got {}", bbox.nrows()));
    }
    if bbox.ncols() == 0 {
        return malformed("zero columns".into());
    }
    for k in 0..bbox.ncols() {
        let (lo, hi) = (bbox[(0, k)], bbox[(1, k)]);
        if !(lo.is_finite() && hi.is_finite()) {
            return malformed(format!("non-finite bound on axis {k}"));
        }
        if lo > hi {
            return malformed(format!("min {lo} > max {hi} on axis {k}"));
        }
    }
    Ok(bbox.ncols())
}

/// Largest row-wise Euclidean distance between two equally shaped point sets.
fn max_displacement(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    (0..a.nrows())
        .map(|r| (a.row(r) - b.row(r)).norm())
        .fold(0.0, f64::max)
}

/// Edge midpoints, one row per edge.
pub(super) fn midpoints(points: &DMatrix<f64>, edges: &DMatrix<usize>) -> DMatrix<f64> {
    DMatrix::from_fn(edges.nrows(), points.ncols(), |r, k| {
        0.5 * (points[(edges[(r, 0)], k)] + points[(edges[(r, 1)], k)])
    })
}

/// Force-scaled bar vectors `F_e * (p_i - p_j)`, one row per edge.
///
/// `hbars` holds the size function at the edge midpoints. Desired lengths are
/// `hbar * length_bias * scale` with `scale = (ΣL^D / Σhbar^D)^(1/D)`; a
/// non-finite or non-positive scale is replaced by 1. A missing `hbars` entry
/// counts as NaN.
pub(super) fn bar_forces(
    points: &DMatrix<f64>,
    edges: &DMatrix<usize>,
    hbars: &DVector<f64>,
) -> DMatrix<f64> {
    let dim = points.ncols();
    let e = edges.nrows();
    let bars = DMatrix::from_fn(e, dim, |r, k| {
        points[(edges[(r, 0)], k)] - points[(edges[(r, 1)], k)]
    });
    let lengths: Vec<f64> = (0..e).map(|r| bars.row(r).norm()).collect();
    let hbar = |r: usize| hbars.get(r).copied().unwrap_or(f64::NAN);

    let exp = dim as i32;
    let sum_l: f64 = lengths.iter().map(|l| l.powi(exp)).sum();
    let sum_h: f64 = (0..e).map(|r| hbar(r).powi(exp)).sum();
    let ratio = (sum_l / sum_h).powf(1.0 / dim as f64);
    let scale = if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    };
    let bias = length_bias(dim);

    let mut forces = bars;
    for (r, &len) in lengths.iter().enumerate() {
        let desired = hbar(r) * bias * scale;
        let f = (desired - len).max(0.0) / len;
        // zero-length or non-finite bars exert no force
        let f = if f.is_finite() { f } else { 0.0 };
        forces.row_mut(r).scale_mut(f);
    }
    forces
}

/// Stateful relaxation run.
///
/// `new` validates the inputs and seeds the points; `step` advances one
/// iteration; `run` drives to a terminal state. The generator exclusively
/// owns its point set and simplex table.
pub struct MeshGenerator<'a, T: Triangulator + ?Sized> {
    fd: &'a dyn Evaluable,
    fh: &'a dyn Evaluable,
    h0: f64,
    cfg: MeshCfg,
    triangulator: &'a T,
    fixed: usize,
    points: DMatrix<f64>,
    simplices: DMatrix<usize>,
    edges: DMatrix<usize>,
    /// Positions used for the current triangulation; `None` before the first.
    snapshot: Option<DMatrix<f64>>,
    state: RelaxState,
    steps: usize,
    retriangulations: usize,
    failed_retriangulations: usize,
}

impl<'a, T: Triangulator + ?Sized> MeshGenerator<'a, T> {
    pub fn new(
        fd: &'a dyn Evaluable,
        fh: &'a dyn Evaluable,
        h0: f64,
        bbox: &DMatrix<f64>,
        fixed: &DMatrix<f64>,
        cfg: MeshCfg,
        triangulator: &'a T,
    ) -> Result<Self, MeshError> {
        cfg.validate()?;
        if !(h0.is_finite() && h0 > 0.0) {
            return Err(MeshError::InvalidEdgeLength { h0 });
        }
        let dim = validate_bbox(bbox)?;
        let fixed = if fixed.nrows() == 0 {
            DMatrix::zeros(0, dim)
        } else {
            if fixed.ncols() != dim {
                return Err(MeshError::DimensionMismatch {
                    what: "fixed points",
                    expected: dim,
                    got: fixed.ncols(),
                });
            }
            if fixed.iter().any(|x| !x.is_finite()) {
                return Err(MeshError::NonFinite {
                    what: "fixed points",
                });
            }
            fixed.clone()
        };

        let tolerance = cfg.geometry_tolerance * h0;
        let d = evaluate(fd, &fixed, "distance function")?;
        if let Some(index) = (0..d.len()).find(|&i| d[i] > tolerance) {
            return Err(MeshError::FixedPointOutside {
                index,
                distance: d[index],
                tolerance,
            });
        }

        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let points = create_point_list(fd, fh, h0, bbox, &fixed, &cfg, &mut rng)?;
        if points.nrows() < dim + 1 {
            return Err(MeshError::InsufficientPoints {
                needed: dim + 1,
                got: points.nrows(),
            });
        }
        tracing::info!(
            points = points.nrows(),
            fixed = fixed.nrows(),
            dim,
            h0,
            "seeded mesh points"
        );

        Ok(Self {
            fd,
            fh,
            h0,
            cfg,
            triangulator,
            fixed: fixed.nrows(),
            points,
            simplices: DMatrix::zeros(0, dim + 1),
            edges: DMatrix::zeros(0, 2),
            snapshot: None,
            state: RelaxState::Seeded,
            steps: 0,
            retriangulations: 0,
            failed_retriangulations: 0,
        })
    }

    pub fn points(&self) -> &DMatrix<f64> {
        &self.points
    }

    pub fn simplices(&self) -> &DMatrix<usize> {
        &self.simplices
    }

    pub fn edges(&self) -> &DMatrix<usize> {
        &self.edges
    }

    pub fn state(&self) -> RelaxState {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn retriangulations(&self) -> usize {
        self.retriangulations
    }

    /// Retriangulations rejected after the first success.
    pub fn failed_retriangulations(&self) -> usize {
        self.failed_retriangulations
    }

    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    fn needs_retriangulation(&self) -> bool {
        match &self.snapshot {
            None => true,
            Some(old) => {
                max_displacement(&self.points, old) / self.h0 > self.cfg.retriangulation_tolerance
            }
        }
    }

    /// Replace simplices, edges and snapshot; on error nothing changes.
    fn retriangulate(&mut self) -> Result<(), MeshError> {
        let table = self.triangulator.triangulate(&self.points)?;
        let d = self.fd.eval(&centroids(&self.points, &table));
        let limit = -self.cfg.geometry_tolerance * self.h0;
        let keep: Vec<usize> = (0..table.nrows())
            .filter(|&r| d.get(r).is_some_and(|&v| v < limit))
            .collect();
        if keep.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        self.simplices = DMatrix::from_fn(keep.len(), table.ncols(), |r, c| table[(keep[r], c)]);
        self.edges = unique_edges(&self.simplices);
        self.snapshot = Some(self.points.clone());
        self.retriangulations += 1;
        tracing::debug!(
            step = self.steps,
            simplices = self.simplices.nrows(),
            edges = self.edges.nrows(),
            "retriangulated"
        );
        Ok(())
    }

    /// Advance one iteration and return the new state.
    ///
    /// Terminal states are sticky: stepping a finished run is a no-op.
    pub fn step(&mut self) -> Result<RelaxState, MeshError> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        self.state = RelaxState::Relaxing;

        if self.needs_retriangulation() {
            match self.retriangulate() {
                Ok(()) => {}
                // after the first success a rejected point set keeps the
                // previous simplices; the next step retries
                Err(err) if self.snapshot.is_some() => {
                    self.failed_retriangulations += 1;
                    tracing::debug!(
                        step = self.steps,
                        error = %err,
                        "retriangulation failed, keeping previous simplices"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        let hbars = self.fh.eval(&midpoints(&self.points, &self.edges));
        let forces = bar_forces(&self.points, &self.edges, &hbars);
        let previous = self.points.clone();
        let dt = self.cfg.delta_t;
        for r in 0..self.edges.nrows() {
            let (i, j) = (self.edges[(r, 0)], self.edges[(r, 1)]);
            for k in 0..self.dim() {
                let delta = dt * forces[(r, k)];
                if i >= self.fixed {
                    self.points[(i, k)] += delta;
                }
                if j >= self.fixed {
                    self.points[(j, k)] -= delta;
                }
            }
        }
        project_points_to_boundary(self.fd, self.h0, &mut self.points, self.fixed);

        self.steps += 1;
        let movement = max_displacement(&self.points, &previous) / self.h0;
        if movement < self.cfg.point_movement_tolerance {
            self.state = RelaxState::Converged;
        } else if self.steps >= self.cfg.max_steps {
            self.state = RelaxState::IterationCapReached;
            tracing::warn!(
                steps = self.steps,
                movement,
                "iteration cap reached before convergence"
            );
        }
        Ok(self.state)
    }

    /// Iterate to a terminal state and hand over the mesh.
    pub fn run(mut self) -> Result<Mesh, MeshError> {
        while !self.state.is_terminal() {
            self.step()?;
        }
        let termination = match self.state {
            RelaxState::Converged => Termination::Converged,
            _ => Termination::IterationCapReached,
        };
        tracing::info!(
            ?termination,
            steps = self.steps,
            retriangulations = self.retriangulations,
            failed_retriangulations = self.failed_retriangulations,
            points = self.points.nrows(),
            simplices = self.simplices.nrows(),
            "mesh generation finished"
        );
        Ok(Mesh {
            points: self.points,
            simplices: self.simplices,
            termination,
            steps: self.steps,
            retriangulations: self.retriangulations,
        })
    }
}
