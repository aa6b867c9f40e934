//! Demonstration of channel-fed streaming execution
//!
//! This example shows how to:
//! - Compile a model with a join across two live sources
//! - Drive it from an async channel with a StreamRunner
//! - Watch per-source progress while the stream is running
//! - Recover the model and its statistics after the feed closes
//!
//! Run with: cargo run --example streaming_demo

use octopus_processor::{
    AlgorithmKind, Model, ProcessorConfig, SourceEvent, StreamRunner, TraceSink,
};
use octopus_types::Event;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting streaming demo");

    // temperatures + pressures --> ratio (t / p) --> out
    let mut model = Model::new("sensor_ratio");
    model.add_source("temperatures")?;
    model.add_source("pressures")?;

    let ratio = ProcessorConfig::new("ratio", AlgorithmKind::Division)
        .with_input(1, "reading")
        .with_input(2, "reading")
        .with_join(1, 2)
        .with_output("ratio", "value");
    model.add_processor(ratio)?;

    model.add_sink("out")?;
    model.connect("temperatures", "ratio", 1)?;
    model.connect("pressures", "ratio", 2)?;
    model.connect_sink("ratio", "out")?;

    let mut compiled = model.compile()?;
    compiled.bind_sink("out", TraceSink)?;

    let (runner, sender) = StreamRunner::channel(compiled, 32);
    let progress = runner.progress();
    let handle = runner.spawn();

    // Interleave readings from both sensors; each pair completes one join.
    for i in 0..10 {
        let temperature = 20.0 + i as f64;
        let pressure = 1.0 + i as f64 * 0.1;
        sender
            .send(SourceEvent::new(
                "temperatures",
                Event::new("reading").with_attribute("reading", temperature),
            ))
            .await?;
        sender
            .send(SourceEvent::new(
                "pressures",
                Event::new("reading").with_attribute("reading", pressure),
            ))
            .await?;
    }

    for entry in progress.iter() {
        info!("  progress {}: {} events", entry.key(), entry.value());
    }

    // Closing the channel stops the runner.
    drop(sender);
    let finished = handle.await?;

    let stats = finished.stats();
    info!("Stream statistics:");
    info!("  Events In: {}", stats.events_in);
    info!("  Events Out: {}", stats.events_out);
    info!("  Firings: {}", stats.fired);
    info!("  Skipped Offers: {}", stats.skipped);

    info!("Demo completed successfully!");
    Ok(())
}
