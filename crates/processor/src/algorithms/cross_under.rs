//! Sustained cross detection over a three-sample window
//!
//! Like crossing detection, but demands the move hold across a gap: only the
//! oldest and newest of three samples are compared, the middle one is
//! ignored. Output is `true` exactly when series a was at or below b three
//! firings ago and is strictly above b now.

use serde::{Deserialize, Serialize};

use octopus_types::AttributeValue;

use super::{pair_operands, InputBinding};
use crate::dispatch::EventBundle;
use crate::memory::Memory;

const WINDOW: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossUnder {
    a: InputBinding,
    b: InputBinding,
    window: Memory<(f64, f64)>,
}

impl CrossUnder {
    pub fn new(a: InputBinding, b: InputBinding) -> Self {
        Self {
            a,
            b,
            window: Memory::new(WINDOW),
        }
    }

    /// Appends the current pair and compares samples 0 and 2. A null or
    /// non-numeric operand skips the firing; a window that is not yet full
    /// reports `false`.
    pub fn evaluate(&mut self, bundle: &EventBundle) -> Option<AttributeValue> {
        let pair = pair_operands(bundle, &self.a, &self.b)?;
        self.window.push(pair);

        if !self.window.is_full() {
            return Some(AttributeValue::Boolean(false));
        }

        let (old_a, old_b) = *self.window.get(0)?;
        let (new_a, new_b) = *self.window.get(2)?;
        Some(AttributeValue::Boolean(old_a <= old_b && new_a > new_b))
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
