mod domains;
mod meshfile;
mod provenance;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use distmesh::{distmesh_with, triangulation::Delaunay, MeshCfg};
use domains::Shape;
use meshfile::MeshFile;
use provenance::{write_sidecar, Payload};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Mesh example domains and inspect mesh artifacts")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Mesh a named domain and write a JSON mesh plus provenance sidecar
    Mesh {
        #[arg(long, value_enum)]
        shape: Shape,
        #[arg(long, default_value_t = 0.2)]
        h0: f64,
        #[arg(long)]
        out: PathBuf,
        /// Seed for point sampling (OS entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_steps: Option<usize>,
        /// JSON file with `MeshCfg` overrides
        #[arg(long)]
        cfg: Option<PathBuf>,
    },
    /// Recompute boundary facets of a stored mesh
    Boundary {
        #[arg(long)]
        mesh: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Mesh {
            shape,
            h0,
            out,
            seed,
            max_steps,
            cfg,
        } => mesh(shape, h0, out, seed, max_steps, cfg),
        Action::Boundary { mesh, out } => boundary(mesh, out),
        Action::Report => report(),
    }
}

fn load_cfg(path: Option<&PathBuf>, seed: Option<u64>, max_steps: Option<usize>) -> Result<MeshCfg> {
    let mut cfg = match path {
        Some(p) => {
            let bytes = std::fs::read(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", p.display()))?
        }
        None => MeshCfg::default(),
    };
    if seed.is_some() {
        cfg.seed = seed;
    }
    if let Some(n) = max_steps {
        cfg.max_steps = n;
    }
    Ok(cfg)
}

fn mesh(
    shape: Shape,
    h0: f64,
    out: PathBuf,
    seed: Option<u64>,
    max_steps: Option<usize>,
    cfg_path: Option<PathBuf>,
) -> Result<()> {
    let cfg = load_cfg(cfg_path.as_ref(), seed, max_steps)?;
    tracing::info!(?shape, h0, out = %out.display(), ?cfg, "mesh");
    let dom = shape.domain();
    let result = distmesh_with(
        &dom.fd,
        &dom.fh,
        h0,
        &dom.bbox,
        &dom.fixed,
        cfg,
        &Delaunay::default(),
    )
    .with_context(|| format!("meshing {shape:?}"))?;

    let file = MeshFile::from_mesh(&result);
    file.write(&out)?;
    let summary = json!({
        "termination": result.termination,
        "steps": result.steps,
        "retriangulations": result.retriangulations,
        "points": result.points.nrows(),
        "simplices": result.simplices.nrows(),
        "boundary_facets": file.boundary.len(),
    });
    let params = json!({ "shape": shape, "h0": h0, "cfg": cfg });
    let prov = write_sidecar(&out, Payload::new(params).with_summary(summary))?;
    tracing::info!(
        termination = ?result.termination,
        steps = result.steps,
        provenance = %prov.display(),
        "wrote mesh"
    );
    Ok(())
}

fn boundary(mesh: PathBuf, out: PathBuf) -> Result<()> {
    tracing::info!(mesh = %mesh.display(), out = %out.display(), "boundary");
    let mut file = MeshFile::read(&mesh)?;
    file.refresh_boundary()?;
    file.write(&out)?;
    let params = json!({ "from": mesh.to_string_lossy() });
    write_sidecar(&out, Payload::new(params))?;
    tracing::info!(facets = file.boundary.len(), "wrote boundary");
    Ok(())
}

fn report() -> Result<()> {
    let obj = provenance::block(json!({ "defaults": MeshCfg::default() }), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cli_arguments_parse() {
        let cmd = Cmd::try_parse_from([
            "cli", "mesh", "--shape", "ring", "--h0", "0.1", "--out", "m.json", "--seed", "3",
        ])
        .unwrap();
        match cmd.action {
            Action::Mesh { shape, h0, seed, .. } => {
                assert_eq!(shape, Shape::Ring);
                assert_eq!(h0, 0.1);
                assert_eq!(seed, Some(3));
            }
            _ => panic!("expected mesh subcommand"),
        }
        assert!(Cmd::try_parse_from(["cli", "mesh", "--shape", "torus", "--out", "x"]).is_err());
    }

    #[test]
    fn cfg_file_overrides_merge_with_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "delta_t": 0.2, "seed": 1 }"#).unwrap();
        let cfg = load_cfg(Some(&path), Some(9), Some(40)).unwrap();
        assert_eq!(cfg.delta_t, 0.2);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.max_steps, 40);
        assert_eq!(cfg.point_movement_tolerance, MeshCfg::default().point_movement_tolerance);
    }

    #[test]
    fn mesh_then_boundary_writes_artifacts() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("disk.json");
        mesh(Shape::Disk, 0.4, out.clone(), Some(1), Some(200), None).unwrap();
        assert!(dir.path().join("disk.provenance.json").exists());
        let stored = MeshFile::read(&out).unwrap();
        assert_eq!(stored.dim, 2);
        assert!(!stored.simplices.is_empty());

        let b = dir.path().join("disk_boundary.json");
        boundary(out, b.clone()).unwrap();
        assert_eq!(MeshFile::read(&b).unwrap().boundary, stored.boundary);
    }
}
