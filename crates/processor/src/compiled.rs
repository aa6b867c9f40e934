//! Compiled processor units
//!
//! A [`CompiledProcessor`] is the runnable form of a
//! [`ProcessorConfig`](crate::config::ProcessorConfig): the algorithm with
//! its window state, the join dispatcher buffering partial input, and the
//! output surface that wraps each produced value into a fresh event. Every
//! compilation owns its state outright, so two units compiled from the same
//! template never observe each other.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

use octopus_types::{AttributeValue, Event};

use crate::algorithms::{Algorithm, AlgorithmKind};
use crate::config::Output;
use crate::dispatch::{EventBundle, JoinDispatcher};
use crate::error::{ProcessorError, Result};

/// A processor compiled from a template, ready to consume events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledProcessor {
    name: String,
    algorithm: Algorithm,
    dispatcher: JoinDispatcher,
    input_ids: BTreeSet<u32>,
    output: Output,
}

impl CompiledProcessor {
    pub(crate) fn new(
        name: String,
        algorithm: Algorithm,
        dispatcher: JoinDispatcher,
        input_ids: impl IntoIterator<Item = u32>,
        output: Output,
    ) -> Self {
        Self {
            name,
            algorithm,
            dispatcher,
            input_ids: input_ids.into_iter().collect(),
            output,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.algorithm.kind()
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Whether the processor declares the given input id.
    pub fn accepts(&self, input_id: u32) -> bool {
        self.input_ids.contains(&input_id)
    }

    /// Declared input ids in ascending order.
    pub fn input_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.input_ids.iter().copied()
    }

    /// Offers one event on one input.
    ///
    /// Returns `Ok(None)` when the event was buffered toward an incomplete
    /// join, or when the algorithm produced nothing this firing (window
    /// still filling, skipped null operand). Returns the wrapped output
    /// event when the algorithm produced a value. Fails when `input_id` is
    /// not declared on this processor or the algorithm rejects an operand.
    pub fn offer(&mut self, input_id: u32, event: Event) -> Result<Option<Event>> {
        if !self.input_ids.contains(&input_id) {
            return Err(ProcessorError::UnknownInput {
                processor: self.name.clone(),
                input: input_id.to_string(),
            });
        }

        let Some(bundle) = self.dispatcher.offer(input_id, event) else {
            trace!(
                processor = %self.name,
                input = input_id,
                pending = self.dispatcher.pending_len(),
                "buffered toward incomplete join"
            );
            return Ok(None);
        };

        Ok(self.process_bundle(&bundle)?.map(|value| self.wrap(value)))
    }

    /// Runs one firing over an already-complete bundle, returning the raw
    /// produced value without wrapping it into an event.
    pub fn process_bundle(&mut self, bundle: &EventBundle) -> Result<Option<AttributeValue>> {
        let produced = self.algorithm.evaluate(&self.name, bundle)?;
        match &produced {
            Some(value) => trace!(processor = %self.name, %value, "fired"),
            None => trace!(processor = %self.name, "fired without output"),
        }
        Ok(produced)
    }

    /// Drops all window state and pending join buffers.
    pub fn reset(&mut self) {
        self.algorithm.reset();
        self.dispatcher.clear();
        debug!(processor = %self.name, "reset");
    }

    fn wrap(&self, value: AttributeValue) -> Event {
        Event::new(self.output.event_name.clone())
            .with_attribute(self.output.attribute.clone(), value)
    }
}
