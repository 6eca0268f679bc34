use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::edges::{boundary_edges, unique_edges};

/// Lifecycle of one relaxation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelaxState {
    /// Points seeded, no triangulation yet.
    Seeded,
    Relaxing,
    Converged,
    IterationCapReached,
}

impl RelaxState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, RelaxState::Converged | RelaxState::IterationCapReached)
    }
}

/// Why a run stopped. Both outcomes yield a usable mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Converged,
    IterationCapReached,
}

/// Result of a run.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// `(N, D)`; the first F rows are the caller's fixed points.
    pub points: DMatrix<f64>,
    /// `(M, D+1)` indices into `points`.
    pub simplices: DMatrix<usize>,
    pub termination: Termination,
    pub steps: usize,
    pub retriangulations: usize,
}

impl Mesh {
    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    /// Facets on the mesh boundary, `(B, D)`.
    pub fn boundary_facets(&self) -> DMatrix<usize> {
        boundary_edges(&self.simplices)
    }

    /// Unique edges, `(E, 2)`.
    pub fn edges(&self) -> DMatrix<usize> {
        unique_edges(&self.simplices)
    }
}
