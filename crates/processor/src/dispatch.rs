//! Join dispatch: turning per-input events into algorithm firings
//!
//! A processor with joined inputs must see one event from every joined input
//! before its algorithm runs. The [`JoinDispatcher`] accumulates pending
//! events keyed by input id and releases a complete [`EventBundle`] the
//! moment the last required input arrives. Inputs outside every join bypass
//! accumulation and fire alone.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

use octopus_types::Event;

/// A completed firing: one event per participating input id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBundle {
    events: HashMap<u32, Event>,
}

impl EventBundle {
    /// Bundle of a single unjoined input.
    pub fn single(input_id: u32, event: Event) -> Self {
        let mut events = HashMap::new();
        events.insert(input_id, event);
        Self { events }
    }

    /// Bundle assembled from explicit `(input id, event)` pairs.
    pub fn from_events(events: impl IntoIterator<Item = (u32, Event)>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    fn from_slots(events: HashMap<u32, Event>) -> Self {
        Self { events }
    }

    /// Event contributed by `input_id`.
    pub fn get(&self, input_id: u32) -> Option<&Event> {
        self.events.get(&input_id)
    }

    /// Number of contributing inputs.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The single event of a one-input bundle.
    pub fn sole(&self) -> Option<&Event> {
        if self.events.len() == 1 {
            self.events.values().next()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Event)> {
        self.events.iter().map(|(id, event)| (*id, event))
    }
}

/// Accumulates joined inputs into complete bundles.
///
/// The required set is the union of all join ends. A newer event on an
/// already-pending slot replaces the older one; a completed firing drains
/// every slot, so no event contributes twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinDispatcher {
    required: HashSet<u32>,
    pending: HashMap<u32, Event>,
}

impl JoinDispatcher {
    /// Builds a dispatcher from the joined input ids.
    pub fn new(required: impl IntoIterator<Item = u32>) -> Self {
        Self {
            required: required.into_iter().collect(),
            pending: HashMap::new(),
        }
    }

    /// True when `input_id` participates in a join.
    pub fn is_joined(&self, input_id: u32) -> bool {
        self.required.contains(&input_id)
    }

    /// Number of slots currently holding an event.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Offers an event; returns a bundle when this completes a firing.
    pub fn offer(&mut self, input_id: u32, event: Event) -> Option<EventBundle> {
        if !self.required.contains(&input_id) {
            return Some(EventBundle::single(input_id, event));
        }

        if self.pending.insert(input_id, event).is_some() {
            trace!(input = input_id, "replaced pending event before firing");
        }

        if self.pending.len() == self.required.len() {
            let slots = std::mem::take(&mut self.pending);
            Some(EventBundle::from_slots(slots))
        } else {
            None
        }
    }

    /// Drops all pending events.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
