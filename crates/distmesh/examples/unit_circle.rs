//! Mesh the unit disk with a uniform edge length.
//!
//! Usage:
//!   cargo run -p distmesh --example unit_circle -- [h0]

use distmesh::prelude::*;

fn main() -> Result<(), MeshError> {
    let h0 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.2);
    let mesh = distmesh(
        &circular(1.0, None),
        &uniform(),
        h0,
        &bounding_box(2),
        &DMatrix::zeros(0, 2),
    )?;
    println!(
        "{:?} after {} steps: {} points, {} triangles, {} boundary edges",
        mesh.termination,
        mesh.steps,
        mesh.points.nrows(),
        mesh.simplices.nrows(),
        mesh.boundary_facets().nrows()
    );
    Ok(())
}
