//! Performance benchmarks for the processor hot path
//!
//! Measures per-event offer latency, windowed algorithm throughput, and
//! whole-model push cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use octopus_processor::algorithms::AlgorithmKind;
use octopus_processor::{CompiledProcessor, Model, ProcessorConfig};
use octopus_types::Event;

fn pair_template(name: &str, kind: AlgorithmKind) -> ProcessorConfig {
    ProcessorConfig::new(name, kind)
        .with_input(1, "a")
        .with_input(2, "b")
        .with_join(1, 2)
        .with_output("result", "value")
}

fn offer_pair(unit: &mut CompiledProcessor, a: f64, b: f64) {
    let left = Event::new("pair").with_attribute("a", a);
    let right = Event::new("pair").with_attribute("b", b);
    unit.offer(1, left).unwrap();
    black_box(unit.offer(2, right).unwrap());
}

/// Benchmark single-event offer latency per algorithm family
fn bench_offer_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("offer_latency");
    group.throughput(Throughput::Elements(1));

    let mut counter = ProcessorConfig::new("counter", AlgorithmKind::Pipe)
        .with_input(1, "v")
        .with_output("count", "n")
        .compile()
        .unwrap();
    group.bench_function("pipe", |b| {
        b.iter(|| {
            black_box(counter.offer(1, Event::new("tick")).unwrap());
        });
    });

    let mut subtraction = pair_template("sub", AlgorithmKind::Subtraction)
        .compile()
        .unwrap();
    group.bench_function("subtraction_joined_pair", |b| {
        b.iter(|| {
            offer_pair(&mut subtraction, 9.0, 4.0);
        });
    });

    let mut crossing = pair_template("cross", AlgorithmKind::Crossing)
        .compile()
        .unwrap();
    let mut toggle = false;
    group.bench_function("crossing_joined_pair", |b| {
        b.iter(|| {
            // Alternate above/below so every firing detects a cross.
            toggle = !toggle;
            let a = if toggle { 3.0 } else { 1.0 };
            offer_pair(&mut crossing, a, 2.0);
        });
    });

    group.finish();
}

/// Benchmark windowed algorithm throughput over event batches
fn bench_windowed_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed_throughput");

    for batch_size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("pearsons_correlation", batch_size),
            batch_size,
            |b, &size| {
                let mut template =
                    pair_template("corr", AlgorithmKind::PearsonsCorrelation);
                template.set_param("window", "20").unwrap();
                b.iter(|| {
                    let mut unit = template.compile().unwrap();
                    for i in 0..size {
                        offer_pair(&mut unit, i as f64, (i * 2) as f64);
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("forecast_srm", batch_size),
            batch_size,
            |b, &size| {
                let mut template = ProcessorConfig::new("trend", AlgorithmKind::ForecastSrm)
                    .with_input(1, "y")
                    .with_output("forecast", "model");
                template.set_param("window", "20").unwrap();
                b.iter(|| {
                    let mut unit = template.compile().unwrap();
                    for i in 0..size {
                        let event = Event::new("sample").with_attribute("y", i as f64);
                        black_box(unit.offer(1, event).unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a whole-model push through a two-stage chain
fn bench_model_push(c: &mut Criterion) {
    let mut model = Model::new("spread_trend");
    model.add_source("quotes").unwrap();
    model
        .add_processor(
            ProcessorConfig::new("spread", AlgorithmKind::Subtraction)
                .with_input(1, "ask")
                .with_input(2, "bid")
                .with_join(1, 2)
                .with_output("spread", "value"),
        )
        .unwrap();
    let mut trend = ProcessorConfig::new("trend", AlgorithmKind::ForecastSrm)
        .with_input(1, "value")
        .with_output("spread_trend", "model");
    trend.set_param("window", "20").unwrap();
    model.add_processor(trend).unwrap();
    model.add_sink("out").unwrap();
    model.connect("quotes", "spread", 1).unwrap();
    model.connect("quotes", "spread", 2).unwrap();
    model.connect("spread", "trend", 1).unwrap();
    model.connect_sink("trend", "out").unwrap();

    let mut group = c.benchmark_group("model_push");
    group.throughput(Throughput::Elements(1));

    let mut compiled = model.compile().unwrap();
    let mut ask = 10.0;
    group.bench_function("two_stage_chain", |b| {
        b.iter(|| {
            ask += 0.25;
            let quote = Event::new("quote")
                .with_attribute("ask", ask)
                .with_attribute("bid", 10.0);
            black_box(compiled.push("quotes", quote).unwrap());
        });
    });

    group.bench_function("compile", |b| {
        b.iter(|| {
            black_box(model.compile().unwrap());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_offer_latency,
    bench_windowed_throughput,
    bench_model_push,
);

criterion_main!(benches);
