//! Benchmarks for pairwise cosine similarity

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use simmat_core::SimilarityEngine;

/// Deterministic matrix with roughly one missing value in seven.
fn synthetic(n_rows: usize, n_cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_rows, n_cols), |(i, j)| {
        let k = i * n_cols + j;
        if k % 7 == 3 {
            f64::NAN
        } else {
            ((k * 31 % 101) as f64 - 50.0) / 10.0
        }
    })
}

fn bench_pairwise(c: &mut Criterion) {
    let engine = SimilarityEngine::new();
    let mut group = c.benchmark_group("pairwise");

    for &n_rows in &[16usize, 128, 512] {
        let m = synthetic(n_rows, 64);
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &m, |b, m| {
            b.iter(|| black_box(engine.pairwise(black_box(m))))
        });
    }

    group.finish();
}

fn bench_between(c: &mut Criterion) {
    let engine = SimilarityEngine::new();
    let x = synthetic(32, 128);
    let y = synthetic(1024, 128);

    c.bench_function("between_32x1024", |b| {
        b.iter(|| black_box(engine.between(black_box(&x), black_box(&y))))
    });
}

criterion_group!(benches, bench_pairwise, bench_between);
criterion_main!(benches);
