//! Benchmarks for fan morphisms: image cones, factorization and fibers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use toric::prelude::*;

fn variety(dim: usize, rays: &[Vec<i64>], cones: Vec<Vec<usize>>) -> ToricVariety {
    let rays = rays.iter().map(|r| LatticePoint::from_i64s(r)).collect();
    match Fan::new(rays, cones, dim, &FanConfig::default()) {
        Ok(fan) => ToricVariety::new(fan),
        Err(e) => panic!("benchmark fan is invalid: {e}"),
    }
}

fn matrix(rows: &[&[i64]]) -> DenseMatrix<Z> {
    DenseMatrix::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|&x| Z::new(x)).collect())
            .collect(),
    )
}

/// The plane with the corner blown up along the rays `(1, j)`.
fn resolved_corner(m: i64) -> ToricVariety {
    let mut rays: Vec<Vec<i64>> = (0..=m).map(|j| vec![1, j]).collect();
    rays.push(vec![0, 1]);
    let cones = (0..rays.len() - 1).map(|i| vec![i, i + 1]).collect();
    variety(2, &rays, cones)
}

fn plane() -> ToricVariety {
    variety(2, &[vec![1, 0], vec![0, 1]], vec![vec![0, 1]])
}

fn projective_space() -> ToricVariety {
    variety(
        3,
        &[vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1], vec![-1, -1, -1]],
        vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]],
    )
}

fn bench_image_cones(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_morphism_new");

    for m in [4, 16, 64] {
        let domain = resolved_corner(m);
        let codomain = plane();
        group.bench_with_input(BenchmarkId::new("resolution", m), &m, |b, _| {
            b.iter(|| {
                black_box(FanMorphism::new(
                    DenseMatrix::identity(2),
                    domain.fan().clone(),
                    codomain.fan().clone(),
                    &MorphismConfig::default(),
                ))
            });
        });
    }

    group.finish();
}

fn bench_factor(c: &mut Criterion) {
    let Ok(phi) = ToricMorphism::from_matrix(
        plane(),
        projective_space(),
        matrix(&[&[2, 0, 0], &[1, 1, 0]]),
        &MorphismConfig::default(),
    ) else {
        return;
    };

    c.bench_function("factor_plane_into_p3", |b| b.iter(|| black_box(phi.factor())));
    c.bench_function("as_polynomial_map_plane_into_p3", |b| {
        b.iter(|| black_box(phi.as_polynomial_map()));
    });
}

fn bench_fibers(c: &mut Criterion) {
    let mut group = c.benchmark_group("fiber_graph");

    for m in [4, 16, 32] {
        let Ok(phi) = ToricMorphism::from_matrix(
            resolved_corner(m),
            plane(),
            DenseMatrix::identity(2),
            &MorphismConfig::default(),
        ) else {
            continue;
        };
        let Some(corner) = phi.codomain().fan().cone_by_indices(&[0, 1]) else {
            continue;
        };
        let corner = corner.cone().clone();

        group.bench_with_input(BenchmarkId::new("corner", m), &m, |b, _| {
            b.iter(|| black_box(phi.fiber_graph(&corner)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_image_cones, bench_factor, bench_fibers);
criterion_main!(benches);
