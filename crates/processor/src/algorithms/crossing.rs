//! Crossing detection over a two-sample window
//!
//! Watches two joined numeric series and reports, per firing, whether series
//! a crossed series b between the previous pair and the current one: `+1`
//! when a moved from below b to above it, `-1` for the reverse, `0` when the
//! ordering held. Comparisons are exact; a tie (`a == b`) on either side
//! never counts as a cross.

use serde::{Deserialize, Serialize};

use octopus_types::AttributeValue;

use super::{pair_operands, InputBinding};
use crate::dispatch::EventBundle;
use crate::memory::Memory;

const WINDOW: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crossing {
    a: InputBinding,
    b: InputBinding,
    window: Memory<(f64, f64)>,
}

impl Crossing {
    pub fn new(a: InputBinding, b: InputBinding) -> Self {
        Self {
            a,
            b,
            window: Memory::new(WINDOW),
        }
    }

    /// Appends the current pair and reports the crossing sign. A null or
    /// non-numeric operand skips the firing entirely; a window that is not
    /// yet full reports the neutral `0`.
    pub fn evaluate(&mut self, bundle: &EventBundle) -> Option<AttributeValue> {
        let pair = pair_operands(bundle, &self.a, &self.b)?;
        self.window.push(pair);

        if !self.window.is_full() {
            return Some(AttributeValue::Integer(0));
        }

        let (prev_a, prev_b) = *self.window.get(0)?;
        let (curr_a, curr_b) = *self.window.get(1)?;

        let sign = if prev_a < prev_b && curr_a > curr_b {
            1
        } else if prev_a > prev_b && curr_a < curr_b {
            -1
        } else {
            0
        };
        Some(AttributeValue::Integer(sign))
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
