//! Benchmarks for cones and fan construction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use toric::prelude::*;

/// Rays of a complete plane fan with `m + 3` rays, listed counterclockwise.
fn polygon_rays(m: i64) -> Vec<LatticePoint> {
    let mut rays: Vec<LatticePoint> = (0..=m).map(|j| LatticePoint::from_i64s(&[1, j])).collect();
    rays.push(LatticePoint::from_i64s(&[0, 1]));
    rays.push(LatticePoint::from_i64s(&[-1, -1]));
    rays
}

fn polygon_cones(nrays: usize) -> Vec<Vec<usize>> {
    (0..nrays).map(|i| vec![i, (i + 1) % nrays]).collect()
}

fn bench_fan_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_new");

    for m in [4, 16, 64] {
        let rays = polygon_rays(m);
        let cones = polygon_cones(rays.len());

        group.bench_with_input(BenchmarkId::new("checked", m), &m, |b, _| {
            b.iter(|| {
                black_box(Fan::new(rays.clone(), cones.clone(), 2, &FanConfig::default()))
            });
        });
        group.bench_with_input(BenchmarkId::new("unchecked", m), &m, |b, _| {
            b.iter(|| {
                black_box(Fan::new(rays.clone(), cones.clone(), 2, &FanConfig::unchecked()))
            });
        });
    }

    group.finish();
}

fn bench_cone_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("cone");

    let generators: Vec<LatticePoint> = [
        [1, 0, 0, 0],
        [0, 1, 0, 0],
        [0, 0, 1, 0],
        [0, 0, 0, 1],
        [1, 1, -1, 0],
        [1, 0, 1, -1],
    ]
    .iter()
    .map(|g| LatticePoint::from_i64s(g))
    .collect();

    group.bench_function("new_4d", |b| {
        b.iter(|| black_box(Cone::new(4, generators.clone())));
    });

    if let Ok(cone) = Cone::new(4, generators.clone()) {
        group.bench_function("faces_4d", |b| b.iter(|| black_box(cone.faces())));
    }

    group.finish();
}

fn bench_point_location(c: &mut Criterion) {
    let rays = polygon_rays(64);
    let cones = polygon_cones(rays.len());
    let Ok(fan) = Fan::new(rays, cones, 2, &FanConfig::default()) else {
        return;
    };
    let point = LatticePoint::from_i64s(&[3, 100]);

    c.bench_function("smallest_cone_containing", |b| {
        b.iter(|| black_box(fan.smallest_cone_containing(&point)));
    });
}

criterion_group!(
    benches,
    bench_fan_construction,
    bench_cone_queries,
    bench_point_location
);
criterion_main!(benches);
