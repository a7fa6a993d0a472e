//! Benchmarks for portopt-math operations.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ndarray::{Array1, Array2};
use portopt_math::{covariance_matrix, percentile, regress, semi_covariance_matrix, tail_mean};
use rand::Rng;

fn random_array(n: usize) -> Array1<f64> {
    let mut rng = rand::thread_rng();
    Array1::from_iter((0..n).map(|_| rng.r#gen::<f64>() * 0.1 - 0.05))
}

fn random_returns(periods: usize, assets: usize) -> Array2<f64> {
    let mut rng = rand::thread_rng();
    Array2::from_shape_fn((periods, assets), |_| rng.r#gen::<f64>() * 0.1 - 0.05)
}

fn bench_covariance(c: &mut Criterion) {
    let mut group = c.benchmark_group("covariance_matrix");

    for (periods, assets) in [(60, 10), (120, 50), (252, 100), (1260, 500)] {
        group.throughput(Throughput::Elements((periods * assets) as u64));
        group.bench_with_input(
            BenchmarkId::new("shape", format!("{periods}x{assets}")),
            &(periods, assets),
            |b, &(periods, assets)| {
                let returns = random_returns(periods, assets);
                b.iter(|| covariance_matrix(black_box(&returns)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_semi_covariance(c: &mut Criterion) {
    let mut group = c.benchmark_group("semi_covariance_matrix");

    for (periods, assets) in [(60, 10), (252, 100)] {
        group.bench_with_input(
            BenchmarkId::new("shape", format!("{periods}x{assets}")),
            &(periods, assets),
            |b, &(periods, assets)| {
                let returns = random_returns(periods, assets);
                b.iter(|| semi_covariance_matrix(black_box(&returns), black_box(0.0)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_tail_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("tail_statistics");

    for size in [60, 252, 2520, 25200] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("percentile", size), &size, |b, &size| {
            let data = random_array(size);
            b.iter(|| percentile(black_box(data.view()), black_box(0.05)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("tail_mean", size), &size, |b, &size| {
            let data = random_array(size);
            b.iter(|| tail_mean(black_box(data.view()), black_box(0.05)).unwrap());
        });
    }

    group.finish();
}

fn bench_regress(c: &mut Criterion) {
    let mut group = c.benchmark_group("regress");

    for size in [60, 252, 2520] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let y = random_array(size);
            let x = random_array(size);
            b.iter(|| regress(black_box(y.view()), black_box(x.view())).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_covariance,
    bench_semi_covariance,
    bench_tail_statistics,
    bench_regress
);
criterion_main!(benches);
