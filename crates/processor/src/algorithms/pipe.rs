//! Stateful pass-through counter
//!
//! The smallest possible windowed processor: a capacity-1 memory holding a
//! counter. Every firing reads the stored value, emits it, and stores the
//! value plus one. Payload content is irrelevant; the counter advances on
//! every event delivered to the input.

use serde::{Deserialize, Serialize};

use octopus_types::AttributeValue;

use super::InputBinding;
use crate::dispatch::EventBundle;
use crate::memory::Memory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    input: InputBinding,
    state: Memory<i64>,
}

impl Pipe {
    pub fn new(input: InputBinding) -> Self {
        Self {
            input,
            state: Memory::new(1),
        }
    }

    /// Emits the stored counter and advances it. Fires on every event.
    pub fn evaluate(&mut self, _bundle: &EventBundle) -> Option<AttributeValue> {
        let current = self.state.latest().copied().unwrap_or(0);
        self.state.push(current + 1);
        Some(AttributeValue::Integer(current))
    }

    pub fn reset(&mut self) {
        self.state.clear();
    }
}
