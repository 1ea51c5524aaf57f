use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_bank_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("bank_parsing");

    let small_toml = generate_bank_toml(10);
    let medium_toml = generate_bank_toml(100);
    let large_toml = generate_bank_toml(1000);

    group.bench_function("10_items", |b| {
        b.iter(|| {
            adaptest_core::parser::parse_item_bank_str(
                black_box(&small_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.bench_function("100_items", |b| {
        b.iter(|| {
            adaptest_core::parser::parse_item_bank_str(
                black_box(&medium_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.bench_function("1000_items", |b| {
        b.iter(|| {
            adaptest_core::parser::parse_item_bank_str(
                black_box(&large_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let bank = adaptest_core::parser::parse_item_bank_str(
        &generate_bank_toml(1000),
        "bench.toml".as_ref(),
    )
    .unwrap();

    c.bench_function("validate_1000_items", |b| {
        b.iter(|| adaptest_core::parser::validate_item_bank(black_box(&bank)))
    });
}

fn generate_bank_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[bank]
id = "bench"
name = "Benchmark"
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[items]]
id = "item_{i}"
prompt = "Question {i}"
difficulty = {}
topic = "bench"
"#,
            i % 101
        ));
    }
    s
}

criterion_group!(benches, bench_bank_parsing, bench_validation);
criterion_main!(benches);
