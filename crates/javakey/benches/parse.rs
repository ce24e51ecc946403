use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use javakey::{parse, Recorder};

const KEYS: &[(&str, &str)] = &[
    ("package", "java.util.concurrent"),
    ("simple_type", "Ljava.lang.Object;"),
    ("array", "[[Ljava.lang.String;"),
    (
        "parameterized",
        "Ljava.util.Map<Ljava.lang.String;Ljava.util.List<Ljava.lang.Integer;>;>;",
    ),
    (
        "method",
        "Ljava.util.Collections;.sort<T:Ljava.lang.Object;>(Ljava.util.List<TT;>;)V",
    ),
    ("local_var", "Lp.X;.run()V#1#0#total"),
];

fn deeply_nested_key(depth: usize) -> String {
    let mut out = String::new();
    for _ in 0..depth {
        out.push_str("Ljava.util.List<");
    }
    out.push_str("Ljava.lang.String;");
    for _ in 0..depth {
        out.push_str(">;");
    }
    out
}

fn bench_parse_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_parse");
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    for &(id, key) in KEYS {
        group.bench_with_input(BenchmarkId::from_parameter(id), key, |b, key| {
            b.iter(|| black_box(parse(black_box(key), Recorder::default())))
        });
    }

    let nested = deeply_nested_key(64);
    group.bench_with_input(
        BenchmarkId::from_parameter("nested_64"),
        nested.as_str(),
        |b, key| b.iter(|| black_box(parse(black_box(key), Recorder::default()))),
    );

    group.finish();
}

fn bench_validate_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_validate");
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    for &(id, key) in KEYS {
        group.bench_with_input(BenchmarkId::from_parameter(id), key, |b, key| {
            b.iter(|| black_box(javakey::validate(black_box(key))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_key, bench_validate_key);
criterion_main!(benches);
