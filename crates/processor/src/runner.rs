//! Async streaming runner
//!
//! Adapts a [`CompiledModel`] to a live feed: events tagged with their
//! source name arrive asynchronously, the runner pushes each one through the
//! model as it lands. The runner handles:
//! - draining an [`EventFeed`] (an mpsc channel in the default wiring)
//! - absorbing push failures into the model's error counter so one bad
//!   event never halts a long-running stream
//! - exposing live per-source counters readable from other tasks
//!
//! # Example
//!
//! ```rust,no_run
//! use octopus_processor::model::Model;
//! use octopus_processor::runner::{SourceEvent, StreamRunner};
//! use octopus_types::Event;
//!
//! # async fn example(model: Model) -> anyhow::Result<()> {
//! let compiled = model.compile()?;
//! let (runner, sender) = StreamRunner::channel(compiled, 256);
//! let handle = runner.spawn();
//!
//! sender.send(SourceEvent::new("readings", Event::new("r"))).await?;
//! drop(sender);
//!
//! let model = handle.await?;
//! println!("processed {}", model.stats().events_in);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use octopus_types::Event;

use crate::model::CompiledModel;

/// One event tagged with the source node it enters the model on.
#[derive(Debug, Clone)]
pub struct SourceEvent {
    pub source: String,
    pub event: Event,
}

impl SourceEvent {
    pub fn new(source: impl Into<String>, event: Event) -> Self {
        Self {
            source: source.into(),
            event,
        }
    }
}

/// Asynchronous supplier of source-tagged events.
#[async_trait]
pub trait EventFeed: Send {
    /// The next event, or `None` once the feed is closed.
    async fn next_event(&mut self) -> Option<SourceEvent>;
}

#[async_trait]
impl EventFeed for mpsc::Receiver<SourceEvent> {
    async fn next_event(&mut self) -> Option<SourceEvent> {
        self.recv().await
    }
}

/// Drains an event feed into a compiled model.
pub struct StreamRunner<F: EventFeed> {
    model: CompiledModel,
    feed: F,
    progress: Arc<DashMap<String, u64>>,
}

impl StreamRunner<mpsc::Receiver<SourceEvent>> {
    /// Wires a runner to an mpsc channel of the given capacity and returns
    /// the sender half. The runner stops once every sender is dropped.
    pub fn channel(
        model: CompiledModel,
        capacity: usize,
    ) -> (Self, mpsc::Sender<SourceEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(model, receiver), sender)
    }
}

impl<F: EventFeed> StreamRunner<F> {
    pub fn new(model: CompiledModel, feed: F) -> Self {
        Self {
            model,
            feed,
            progress: Arc::new(DashMap::new()),
        }
    }

    /// Live per-source ingestion counters. The handle stays readable from
    /// other tasks while the runner owns the model.
    pub fn progress(&self) -> Arc<DashMap<String, u64>> {
        Arc::clone(&self.progress)
    }

    /// Drains the feed to exhaustion, then hands the model back with its
    /// accumulated window state and stats.
    ///
    /// A failed push is logged and counted in the model's `errors` stat;
    /// the stream keeps running.
    pub async fn run(mut self) -> CompiledModel {
        info!(model = %self.model.name(), "stream runner started");

        while let Some(incoming) = self.feed.next_event().await {
            *self.progress.entry(incoming.source.clone()).or_insert(0) += 1;
            if let Err(err) = self.model.push(&incoming.source, incoming.event) {
                error!(
                    model = %self.model.name(),
                    source = %incoming.source,
                    error = %err,
                    "push failed"
                );
                self.model.stats_mut().inc_errors();
            }
        }

        info!(
            model = %self.model.name(),
            events_in = self.model.stats().events_in,
            errors = self.model.stats().errors,
            "stream runner stopped"
        );
        self.model
    }

    /// Runs on a background task and returns its handle.
    pub fn spawn(self) -> JoinHandle<CompiledModel>
    where
        F: 'static,
    {
        tokio::spawn(self.run())
    }
}
