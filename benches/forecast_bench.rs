//! Benchmarks for schema inference and forecasting
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tabular_forecast::table::{Record, SchemaInferrer};
use tabular_forecast::{ForecastEngine, ModelKind};

/// Generate sample sales records for benchmarking
fn generate_sample_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new()
                .with("period", i as i64 + 1)
                .with("region", format!("region-{}", i % 4))
                .with("sales", 1000.0 + (i as f64 * 12.5) + ((i % 7) as f64 * 30.0))
                .with("returns", (i % 5) as i64)
        })
        .collect()
}

/// Benchmark schema inference with varying record counts
fn bench_schema_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_inference");

    for count in [10, 100, 1000].iter() {
        let records = generate_sample_records(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(
            BenchmarkId::new("infer_schema", count),
            &records,
            |b, records| {
                b.iter(|| {
                    let mut inferrer = SchemaInferrer::new();
                    let _ = inferrer.add_records(records);
                    black_box(inferrer.finalize())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark end-to-end forecasts per model family
fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast");
    let engine = ForecastEngine::new();

    for kind in ModelKind::ALL {
        for count in [12, 120].iter() {
            let records = generate_sample_records(*count);
            group.throughput(Throughput::Elements(*count as u64));

            group.bench_with_input(
                BenchmarkId::new(kind.as_str(), count),
                &records,
                |b, records| {
                    b.iter(|| black_box(engine.forecast(records, kind.as_str())));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_schema_inference, bench_forecast);
criterion_main!(benches);
