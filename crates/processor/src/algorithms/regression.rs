//! Simple linear regression over a sliding window of pairs
//!
//! Fits `y = A + Bx` over the window, with x from the first joined input and
//! y from the second. Output is a map holding the intercept A and slope B
//! under configurable key names; an empty map stands in until the window is
//! full (or when the fit is degenerate).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use octopus_types::AttributeValue;

use super::{pair_operands, InputBinding};
use crate::dispatch::EventBundle;
use crate::memory::Memory;
use crate::stats::PairStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    x: InputBinding,
    y: InputBinding,
    intercept_name: String,
    slope_name: String,
    window: Memory<(f64, f64)>,
}

impl LinearRegression {
    pub fn new(
        x: InputBinding,
        y: InputBinding,
        window: usize,
        intercept_name: impl Into<String>,
        slope_name: impl Into<String>,
    ) -> Self {
        Self {
            x,
            y,
            intercept_name: intercept_name.into(),
            slope_name: slope_name.into(),
            window: Memory::new(window),
        }
    }

    /// Appends the current pair and reports the fitted coefficients. A null
    /// operand skips the firing; a partial window or a fit without x-variance
    /// reports an empty map.
    pub fn evaluate(&mut self, bundle: &EventBundle) -> Option<AttributeValue> {
        let pair = pair_operands(bundle, &self.x, &self.y)?;
        self.window.push(pair);

        let mut coefficients = BTreeMap::new();
        if self.window.is_full() {
            let stats = PairStats::from_pairs(self.window.iter().copied());
            if let (Some(intercept), Some(slope)) = (stats.intercept(), stats.slope()) {
                coefficients.insert(
                    self.intercept_name.clone(),
                    AttributeValue::Float(intercept),
                );
                coefficients.insert(self.slope_name.clone(), AttributeValue::Float(slope));
            }
        }
        Some(AttributeValue::Map(coefficients))
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
