use criterion::{black_box, criterion_group, criterion_main, Criterion};

use adaptest_core::discrimination::calculate_discrimination_index;
use adaptest_core::estimator::estimate_theta;
use adaptest_core::model::Response;

fn make_responses(n: usize) -> Vec<Response> {
    (0..n)
        .map(|i| {
            let difficulty = (i * 37 % 101) as f64;
            // Roughly an examinee at the scale midpoint.
            Response::new(difficulty, difficulty < 50.0 || i % 3 == 0)
        })
        .collect()
}

fn bench_estimate_theta(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_theta");

    let small = make_responses(10);
    let medium = make_responses(50);
    let large = make_responses(200);
    let all_correct: Vec<Response> = (0..20).map(|i| Response::correct(i as f64 * 5.0)).collect();

    group.bench_function("10_responses", |b| {
        b.iter(|| estimate_theta(black_box(&small)))
    });

    group.bench_function("50_responses", |b| {
        b.iter(|| estimate_theta(black_box(&medium)))
    });

    group.bench_function("200_responses", |b| {
        b.iter(|| estimate_theta(black_box(&large)))
    });

    group.bench_function("all_correct", |b| {
        b.iter(|| estimate_theta(black_box(&all_correct)))
    });

    group.finish();
}

fn bench_discrimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("discrimination");

    let top: Vec<i64> = (0..270).map(|i| i64::from(i % 5 != 0)).collect();
    let bottom: Vec<i64> = (0..270).map(|i| i64::from(i % 2 == 0)).collect();

    group.bench_function("270_per_group", |b| {
        b.iter(|| calculate_discrimination_index(black_box(&top), black_box(&bottom)))
    });

    group.finish();
}

criterion_group!(benches, bench_estimate_theta, bench_discrimination);
criterion_main!(benches);
