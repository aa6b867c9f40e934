//! Event sinks
//!
//! A sink receives the events that reach a model's terminal nodes. Sinks are
//! caller-supplied observers: the model pushes each delivered event through
//! [`EventSink::accept`] and keeps no opinion about what happens next.
//!
//! Two implementations ship in-crate: [`VecSink`] collects deliveries behind
//! a shared handle (clone it, bind one clone, read the other after the run),
//! and [`TraceSink`] forwards each delivery to the `tracing` subscriber.

use std::sync::{Arc, Mutex};
use tracing::info;

use octopus_types::Event;

/// Receiver for events delivered to a model's sink nodes.
pub trait EventSink {
    fn accept(&mut self, event: &Event);
}

/// A collecting sink. Clones share the same buffer, so a clone kept outside
/// the model reads everything the bound clone received.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event received so far.
    pub fn collected(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.events.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn accept(&mut self, event: &Event) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// A sink that logs every delivery through `tracing` and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceSink;

impl EventSink for TraceSink {
    fn accept(&mut self, event: &Event) {
        info!(name = %event.name, event = %event, "sink delivery");
    }
}
