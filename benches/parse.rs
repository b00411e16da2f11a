use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_duration");
    for input in ["250ms", "1h30m", "1h2m3.456789s", "12h34m56s789ms123us456ns"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| tyenv::parse_duration(black_box(input)).expect("parse should succeed"));
        });
    }
    group.finish();

    c.bench_function("parse_bool", |b| {
        b.iter(|| tyenv::parse_bool(black_box("False")).expect("parse should succeed"));
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
