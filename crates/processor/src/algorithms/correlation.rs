//! Pearson correlation over a sliding window of pairs
//!
//! Accumulates `(a, b)` pairs from two joined inputs and, once the window is
//! full, reports Pearson's r over the N most recent pairs. Until then it
//! reports nothing at all: a partial window is silence, not a guess.

use serde::{Deserialize, Serialize};

use octopus_types::AttributeValue;

use super::{pair_operands, InputBinding};
use crate::dispatch::EventBundle;
use crate::memory::Memory;
use crate::stats::PairStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PearsonsCorrelation {
    a: InputBinding,
    b: InputBinding,
    window: Memory<(f64, f64)>,
}

impl PearsonsCorrelation {
    pub fn new(a: InputBinding, b: InputBinding, window: usize) -> Self {
        Self {
            a,
            b,
            window: Memory::new(window),
        }
    }

    /// Appends the current pair and reports r once the window is full.
    /// A null operand skips the firing; a degenerate window (zero variance
    /// on either side) stays silent too, since r is undefined there.
    pub fn evaluate(&mut self, bundle: &EventBundle) -> Option<AttributeValue> {
        let pair = pair_operands(bundle, &self.a, &self.b)?;
        self.window.push(pair);

        if !self.window.is_full() {
            return None;
        }

        let stats = PairStats::from_pairs(self.window.iter().copied());
        stats.r().map(AttributeValue::Float)
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
