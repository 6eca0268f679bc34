//! Square with a circular hole, refined towards the hole.
//!
//! Usage:
//!   cargo run -p distmesh --example rectangle_with_hole

use distmesh::prelude::*;
use nalgebra::dmatrix;

fn main() -> Result<(), MeshError> {
    let bbox = bounding_box(2);
    let fd = rectangular(&bbox).diff(&circular(0.5, None));
    let fh = 0.05 + 0.3 * circular(0.5, None);
    let corners = dmatrix![-1.0, -1.0; -1.0, 1.0; 1.0, -1.0; 1.0, 1.0];
    let cfg = MeshCfg::default().with_seed(7);
    let mesh = distmesh_with(&fd, &fh, 0.05, &bbox, &corners, cfg, &Delaunay::default())?;
    println!(
        "{:?} after {} steps ({} retriangulations): {} points, {} triangles",
        mesh.termination,
        mesh.steps,
        mesh.retriangulations,
        mesh.points.nrows(),
        mesh.simplices.nrows()
    );
    Ok(())
}
