//! Criterion benchmarks for the relaxation engine and its building blocks.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p distmesh

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use distmesh::prelude::*;
use distmesh::seed::lattice;

fn bench_unit_disk(c: &mut Criterion) {
    let mut group = c.benchmark_group("unit_disk");
    group.sample_size(10);
    let fd = circular(1.0, None);
    let fh = uniform();
    for &h0 in &[0.2f64, 0.1] {
        group.bench_with_input(BenchmarkId::new("distmesh", h0), &h0, |b, &h0| {
            b.iter(|| {
                let cfg = MeshCfg::default().with_seed(1);
                distmesh_with(
                    &fd,
                    &fh,
                    h0,
                    &bounding_box(2),
                    &DMatrix::zeros(0, 2),
                    cfg,
                    &Delaunay::default(),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_unique_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique_edges");
    for &h in &[0.1f64, 0.05] {
        let pts = lattice(&bounding_box(2), h);
        let tris = SpadeDelaunay.triangulate(&pts).unwrap();
        group.bench_with_input(BenchmarkId::new("hex_lattice", tris.nrows()), &tris, |b, t| {
            b.iter(|| unique_edges(t))
        });
    }
    group.finish();
}

fn bench_bowyer_watson(c: &mut Criterion) {
    let mut group = c.benchmark_group("bowyer_watson");
    group.sample_size(10);
    for &h in &[0.5f64, 0.4] {
        let pts = lattice(&bounding_box(3), h);
        group.bench_with_input(BenchmarkId::new("cubic_lattice", pts.nrows()), &pts, |b, p| {
            b.iter_batched(
                || p.clone(),
                |p| BowyerWatson::default().triangulate(&p).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unit_disk, bench_unique_edges, bench_bowyer_watson);
criterion_main!(benches);
