use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use limno_stats::{HypothesisEngine, TestConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_sample(rng: &mut StdRng, n: usize, shift: f64) -> Vec<f64> {
    // Rounded to one decimal like field readings, so ties are common.
    (0..n)
        .map(|_| ((rng.gen::<f64>() * 10.0 + shift) * 10.0).round() / 10.0)
        .collect()
}

fn bench_tests(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let engine = HypothesisEngine::new();
    let local = HypothesisEngine::without_providers();
    let cfg = TestConfig::default();

    let mut group = c.benchmark_group("hypothesis");
    for n in [30usize, 300, 3000] {
        let x = make_sample(&mut rng, n, 0.0);
        let y = make_sample(&mut rng, n, 0.4);

        group.bench_with_input(BenchmarkId::new("welch", n), &n, |b, _| {
            b.iter(|| engine.t_test_welch(black_box(&x), black_box(&y), &cfg))
        });
        group.bench_with_input(BenchmarkId::new("wilcoxon", n), &n, |b, _| {
            b.iter(|| engine.wilcoxon_signed_rank(black_box(&x), 5.0, &cfg))
        });
        group.bench_with_input(BenchmarkId::new("wilcoxon_local", n), &n, |b, _| {
            b.iter(|| local.wilcoxon_signed_rank(black_box(&x), 5.0, &cfg))
        });
        group.bench_with_input(BenchmarkId::new("mann_whitney", n), &n, |b, _| {
            b.iter(|| engine.mann_whitney_u(black_box(&x), black_box(&y), &cfg))
        });
        group.bench_with_input(BenchmarkId::new("sign", n), &n, |b, _| {
            b.iter(|| engine.sign_test(black_box(&x), 5.0, &cfg))
        });
        group.bench_with_input(BenchmarkId::new("mood", n), &n, |b, _| {
            b.iter(|| engine.mood_median_test(black_box(&x), black_box(&y), &cfg))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tests);
criterion_main!(benches);
