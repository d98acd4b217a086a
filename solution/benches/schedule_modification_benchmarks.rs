use criterion::{criterion_group, criterion_main, Criterion};
use model::test_utilities::init_test_data;
use solution::{evaluation::evaluate, test_utilities::default_schedule};

pub fn schedule_modification_benchmarks(c: &mut Criterion) {
    let d = init_test_data();
    let schedule = default_schedule(&d);
    c.bench_function("with_assignment", |b| {
        b.iter(|| schedule.with_assignment(d.f1, d.key(3, 1), Some(d.b2)))
    });

    let modified = schedule
        .with_assignment(d.f1, d.key(3, 1), Some(d.b2))
        .with_assignment(d.p1, d.key(2, 0), None);
    c.bench_function("diff", |b| b.iter(|| schedule.diff(&modified)));

    c.bench_function("evaluate", |b| b.iter(|| evaluate(&d.problem, &schedule)));
}

criterion_group!(benches, schedule_modification_benchmarks);
criterion_main!(benches);
