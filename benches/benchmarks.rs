criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        matching_lawler_dense_032,
        matching_lawler_dense_128,
        matching_lawler_dense_256,
        matching_lawler_sparse_128,
        matching_exhaustive_dense_008,
}

use lawler::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn instance(n: usize, forbid: f64) -> Weights {
    Weights::sample(n, forbid, &mut SmallRng::seed_from_u64(n as u64))
}

fn matching_lawler_dense_032(c: &mut criterion::Criterion) {
    let weights = instance(32, 0.);
    let mut matcher = LawlerMatcher::new(32);
    c.bench_function("solve a dense 32x32 assignment", |b| {
        b.iter(|| matcher.compute_max(&weights))
    });
}

fn matching_lawler_dense_128(c: &mut criterion::Criterion) {
    let weights = instance(128, 0.);
    let mut matcher = LawlerMatcher::new(128);
    c.bench_function("solve a dense 128x128 assignment", |b| {
        b.iter(|| matcher.compute_max(&weights))
    });
}

fn matching_lawler_dense_256(c: &mut criterion::Criterion) {
    let weights = instance(256, 0.);
    let mut matcher = LawlerMatcher::new(256);
    c.bench_function("solve a dense 256x256 assignment", |b| {
        b.iter(|| matcher.compute_min(&weights))
    });
}

fn matching_lawler_sparse_128(c: &mut criterion::Criterion) {
    let weights = instance(128, 0.5);
    let mut matcher = LawlerMatcher::new(128);
    c.bench_function("solve a half-forbidden 128x128 assignment", |b| {
        b.iter(|| matcher.compute_max(&weights))
    });
}

fn matching_exhaustive_dense_008(c: &mut criterion::Criterion) {
    let weights = instance(8, 0.);
    let mut matcher = ExhaustiveMatcher::new(8);
    c.bench_function("enumerate a dense 8x8 assignment", |b| {
        b.iter(|| matcher.compute_max(&weights))
    });
}
