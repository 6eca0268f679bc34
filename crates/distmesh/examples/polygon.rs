//! Mesh a non-convex polygon with its vertices pinned as fixed points.
//!
//! Usage:
//!   cargo run -p distmesh --example polygon

use distmesh::prelude::*;
use nalgebra::dmatrix;

fn main() -> Result<(), MeshError> {
    let vertices = dmatrix![
        -0.4, -0.5; 0.4, -0.2; 0.4, -0.7; 1.5, -0.4; 0.9, 0.1;
        1.6, 0.8; 0.5, 0.5; 0.2, 1.0; 0.1, 0.4; -0.7, 0.7; -0.4, -0.5
    ];
    let bbox = dmatrix![-1.0, -1.0; 2.0, 1.0];
    // last row closes the loop; pin each corner once
    let fixed = vertices.rows(0, vertices.nrows() - 1).into_owned();
    let mesh = distmesh(&polygon(&vertices), &uniform(), 0.1, &bbox, &fixed)?;
    println!(
        "{:?}: {} points ({} fixed), {} triangles",
        mesh.termination,
        mesh.points.nrows(),
        fixed.nrows(),
        mesh.simplices.nrows()
    );
    Ok(())
}
