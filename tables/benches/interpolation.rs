//! Benchmarks for table construction and the interpolation model.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dds_tables::{DdsTables, InterpolationModel, PhaseSweep, TableConfig};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tables");

    for length in [256usize, 1024, 4096].iter() {
        let config = TableConfig::new(*length, 32, 16, 29, 16).unwrap();
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::from_parameter(length), &config, |b, config| {
            b.iter(|| black_box(DdsTables::build(*config).unwrap()));
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.throughput(Throughput::Elements(1));

    let tables = DdsTables::build(TableConfig::generator()).unwrap();
    let model = InterpolationModel::new(&tables);

    group.bench_function("single_phase", |b| {
        b.iter(|| black_box(model.evaluate(black_box(0x1234_5678))));
    });

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");

    let tables = DdsTables::build(TableConfig::simulation()).unwrap();
    let step = 1u64 << 10;
    let samples = PhaseSweep::new(&tables, step).total();
    group.throughput(Throughput::Elements(samples));

    group.bench_function("summarize_64k", |b| {
        b.iter(|| black_box(PhaseSweep::new(&tables, step).summarize()));
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_evaluate, bench_sweep);
criterion_main!(benches);
