//! 3D to 5D Delaunay via the `delaunay` crate.
//!
//! The crate fixes the dimension at compile time, so `triangulate` dispatches
//! on the column count. Each vertex carries its source row as vertex data;
//! cells are mapped back to row indices through it.
//!
//! The crate seeds its triangulation from the first `D + 1` vertices, so the
//! insertion order starts with an affinely independent subset. Vertices the
//! crate skips as degenerate are reported as `Degenerate` rather than silently
//! dropped.

use delaunay::core::delaunay_triangulation::DelaunayTriangulation;
use delaunay::core::vertex::{Vertex, VertexBuilder};
use delaunay::geometry::kernel::FastKernel;
use delaunay::geometry::point::Point;
use delaunay::geometry::traits::coordinate::Coordinate;
use nalgebra::DMatrix;

use super::{check_input, Triangulator, RANK_TOLERANCE};
use crate::error::TriangulationError;

/// Incremental cavity-insertion Delaunay for 3, 4 and 5 dimensions.
#[derive(Clone, Copy, Debug, Default)]
pub struct IncrementalDelaunay;

impl IncrementalDelaunay {
    pub const DIMENSIONS: std::ops::RangeInclusive<usize> = 3..=5;
}

/// Affine rank of the rows `subset` of `points`.
fn affine_rank(points: &DMatrix<f64>, subset: &[usize]) -> usize {
    let Some((&first, rest)) = subset.split_first() else {
        return 0;
    };
    if rest.is_empty() {
        return 0;
    }
    let m = DMatrix::from_fn(rest.len(), points.ncols(), |i, k| {
        points[(rest[i], k)] - points[(first, k)]
    });
    let sv = m.singular_values();
    let max = sv.max();
    sv.iter().filter(|&&s| s > RANK_TOLERANCE * max).count()
}

/// Row order with an affinely independent `D + 1` prefix.
fn insertion_order(points: &DMatrix<f64>) -> Result<Vec<usize>, TriangulationError> {
    let (n, dim) = points.shape();
    let mut prefix = vec![0];
    for row in 1..n {
        if prefix.len() == dim + 1 {
            break;
        }
        prefix.push(row);
        if affine_rank(points, &prefix) < prefix.len() - 1 {
            prefix.pop();
        }
    }
    if prefix.len() < dim + 1 {
        return Err(TriangulationError::Degenerate {
            reason: format!("points span {} of {dim} dimensions", prefix.len() - 1),
        });
    }
    let mut order = prefix.clone();
    order.extend((0..n).filter(|r| !prefix.contains(r)));
    Ok(order)
}

fn triangulate_in<const D: usize>(
    points: &DMatrix<f64>,
    order: &[usize],
) -> Result<DMatrix<usize>, TriangulationError> {
    let mut vertices: Vec<Vertex<f64, usize, D>> = Vec::with_capacity(order.len());
    for &row in order {
        let coords: [f64; D] = std::array::from_fn(|k| points[(row, k)]);
        let vertex = VertexBuilder::<f64, usize, D>::default()
            .point(Point::new(coords))
            .data(row)
            .build()
            .map_err(|e| TriangulationError::Rejected {
                reason: format!("{e:?}"),
            })?;
        vertices.push(vertex);
    }

    let dt: DelaunayTriangulation<FastKernel<f64>, usize, (), D> =
        DelaunayTriangulation::with_kernel(FastKernel::new(), &vertices).map_err(|e| {
            TriangulationError::Degenerate {
                reason: e.to_string(),
            }
        })?;
    if dt.number_of_vertices() != vertices.len() {
        return Err(TriangulationError::Degenerate {
            reason: format!(
                "{} of {} vertices could not be inserted",
                vertices.len() - dt.number_of_vertices(),
                vertices.len()
            ),
        });
    }

    let tds = dt.tds();
    let mut rows: Vec<Vec<usize>> = Vec::with_capacity(dt.number_of_cells());
    for (_, cell) in dt.cells() {
        let simplex = cell
            .vertices()
            .iter()
            .map(|&key| tds.get_vertex_by_key(key).and_then(|v| v.data))
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| TriangulationError::Rejected {
                reason: "cell references a vertex without a source row".into(),
            })?;
        rows.push(simplex);
    }
    if rows.is_empty() {
        return Err(TriangulationError::Degenerate {
            reason: "no cells".into(),
        });
    }
    Ok(DMatrix::from_fn(rows.len(), D + 1, |r, c| rows[r][c]))
}

impl Triangulator for IncrementalDelaunay {
    fn triangulate(&self, points: &DMatrix<f64>) -> Result<DMatrix<usize>, TriangulationError> {
        let dim = points.ncols();
        if !Self::DIMENSIONS.contains(&dim) {
            return Err(TriangulationError::UnsupportedDimension {
                backend: "delaunay",
                dim,
            });
        }
        check_input(points, "delaunay")?;
        let order = insertion_order(points)?;
        match dim {
            3 => triangulate_in::<3>(points, &order),
            4 => triangulate_in::<4>(points, &order),
            _ => triangulate_in::<5>(points, &order),
        }
    }
}
