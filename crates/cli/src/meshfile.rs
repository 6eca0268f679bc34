//! JSON mesh artifact: row-major points and index tables.

use anyhow::{ensure, Context, Result};
use distmesh::{boundary_edges, Mesh, Termination};
use nalgebra::{DMatrix, Scalar};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MeshFile {
    pub dim: usize,
    pub points: Vec<Vec<f64>>,
    pub simplices: Vec<Vec<usize>>,
    #[serde(default)]
    pub boundary: Vec<Vec<usize>>,
    pub termination: Option<Termination>,
    pub steps: Option<usize>,
}

pub fn rows<T: Scalar + Copy>(m: &DMatrix<T>) -> Vec<Vec<T>> {
    (0..m.nrows())
        .map(|r| m.row(r).iter().copied().collect())
        .collect()
}

fn matrix<T: Scalar + Copy>(rows: &[Vec<T>], width: usize, what: &str) -> Result<DMatrix<T>> {
    ensure!(
        rows.iter().all(|r| r.len() == width),
        "every {what} row must have {width} entries"
    );
    Ok(DMatrix::from_fn(rows.len(), width, |r, c| rows[r][c]))
}

impl MeshFile {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            dim: mesh.dim(),
            points: rows(&mesh.points),
            simplices: rows(&mesh.simplices),
            boundary: rows(&mesh.boundary_facets()),
            termination: Some(mesh.termination),
            steps: Some(mesh.steps),
        }
    }

    pub fn simplex_table(&self) -> Result<DMatrix<usize>> {
        let table = matrix(&self.simplices, self.dim + 1, "simplex")?;
        let n = self.points.len();
        ensure!(
            table.iter().all(|&i| i < n),
            "simplex index out of range (have {n} points)"
        );
        Ok(table)
    }

    /// Recompute boundary facets from the stored simplices.
    pub fn refresh_boundary(&mut self) -> Result<()> {
        self.boundary = rows(&boundary_edges(&self.simplex_table()?));
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_vec(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }
}
