//! Named example domains for the `mesh` subcommand.

use clap::ValueEnum;
use distmesh::prelude::*;
use nalgebra::dmatrix;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Unit disk, uniform size.
    Disk,
    /// [-1, 1]² with pinned corners.
    Square,
    /// Ellipse with semi-axes (1, 0.5).
    Ellipse,
    /// Non-convex polygon with pinned vertices.
    Polygon,
    /// Square with a circular hole, refined towards the hole.
    Ring,
    /// Union of three disks, refined near the boundary.
    Mickey,
}

/// Everything `distmesh_with` needs apart from `h0` and configuration.
pub struct Domain {
    pub fd: Functional,
    pub fh: Functional,
    pub bbox: DMatrix<f64>,
    pub fixed: DMatrix<f64>,
}

fn corners() -> DMatrix<f64> {
    dmatrix![-1.0, -1.0; -1.0, 1.0; 1.0, -1.0; 1.0, 1.0]
}

impl Shape {
    pub fn domain(self) -> Domain {
        let square = bounding_box(2);
        match self {
            Shape::Disk => Domain {
                fd: circular(1.0, None),
                fh: uniform(),
                bbox: square,
                fixed: DMatrix::zeros(0, 2),
            },
            Shape::Square => Domain {
                fd: rectangular(&square),
                fh: uniform(),
                bbox: square,
                fixed: corners(),
            },
            Shape::Ellipse => Domain {
                fd: elliptical(&[1.0, 0.5], None),
                fh: uniform(),
                bbox: dmatrix![-1.0, -0.5; 1.0, 0.5],
                fixed: DMatrix::zeros(0, 2),
            },
            Shape::Polygon => {
                let vertices = dmatrix![
                    -0.4, -0.5; 0.4, -0.2; 0.4, -0.7; 1.5, -0.4; 0.9, 0.1;
                    1.6, 0.8; 0.5, 0.5; 0.2, 1.0; 0.1, 0.4; -0.7, 0.7
                ];
                Domain {
                    fd: polygon(&vertices),
                    fh: uniform(),
                    bbox: dmatrix![-1.0, -1.0; 2.0, 1.0],
                    fixed: vertices,
                }
            }
            Shape::Ring => Domain {
                fd: rectangular(&square).diff(&circular(0.5, None)),
                fh: 0.05 + 0.3 * circular(0.5, None),
                bbox: square,
                fixed: corners(),
            },
            Shape::Mickey => {
                let fd = circular(1.0, None)
                    .union(&circular(0.5, Some(&[-0.8, 0.8])))
                    .union(&circular(0.5, Some(&[0.8, 0.8])));
                Domain {
                    fh: 0.5 - fd.clone(),
                    fd,
                    bbox: dmatrix![-1.3, -1.0; 1.3, 1.3],
                    fixed: DMatrix::zeros(0, 2),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_points_lie_on_their_domains() {
        for shape in Shape::value_variants() {
            let dom = shape.domain();
            let d = dom.fd.eval(&dom.fixed);
            assert!(d.iter().all(|v| v.abs() < 1e-12), "{shape:?}");
            assert_eq!(dom.bbox.nrows(), 2);
        }
    }

    #[test]
    fn size_functions_are_positive_inside() {
        for shape in Shape::value_variants() {
            let dom = shape.domain();
            let samples = dmatrix![0.7, 0.0; -0.7, -0.1];
            let d = dom.fd.eval(&samples);
            let h = dom.fh.eval(&samples);
            for i in 0..2 {
                if d[i] < 0.0 {
                    assert!(h[i] > 0.0, "{shape:?} row {i}");
                }
            }
        }
    }
}
