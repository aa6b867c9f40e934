//! Simple regression model forecast over the window index
//!
//! Treats the window position (0..N-1) as the independent variable and fits
//! `y = intercept + slope * x` over the most recent N samples of one scalar
//! input. Once the window is full, each firing reports the fitted model with
//! its accuracy statistics and the one-step-ahead prediction at x = N.
//!
//! The output map carries: `formula` (rendered fit), `intercept`, `slope`,
//! `intercept_std_err`, `slope_std_err`, `r`, `mse`, `significance`
//! (two-sided p-value of the slope), `slope_confidence` (95% CI half-width),
//! and `forecast`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use octopus_types::AttributeValue;

use super::{numeric_operand, InputBinding};
use crate::dispatch::EventBundle;
use crate::memory::Memory;
use crate::stats::PairStats;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSrm {
    input: InputBinding,
    window: Memory<f64>,
}

impl ForecastSrm {
    pub fn new(input: InputBinding, window: usize) -> Self {
        Self {
            input,
            window: Memory::new(window),
        }
    }

    /// Appends the current sample and, once the window is full, reports the
    /// fitted model. A null or non-numeric operand skips the firing.
    pub fn evaluate(&mut self, bundle: &EventBundle) -> Option<AttributeValue> {
        let sample = numeric_operand(bundle, &self.input)?;
        self.window.push(sample);

        if !self.window.is_full() {
            return None;
        }

        let stats = PairStats::from_pairs(
            self.window
                .iter()
                .enumerate()
                .map(|(index, y)| (index as f64, *y)),
        );

        // The index series always has variance for a window of 2 or more,
        // so a fit exists whenever the window is full.
        let intercept = stats.intercept()?;
        let slope = stats.slope()?;
        let next_index = self.window.capacity() as f64;

        let mut model = BTreeMap::new();
        model.insert(
            "formula".to_string(),
            AttributeValue::Text(format!("y = {} + {} * x", intercept, slope)),
        );
        model.insert("intercept".to_string(), AttributeValue::Float(intercept));
        model.insert("slope".to_string(), AttributeValue::Float(slope));
        model.insert(
            "intercept_std_err".to_string(),
            AttributeValue::Float(stats.intercept_std_err().unwrap_or(0.0)),
        );
        model.insert(
            "slope_std_err".to_string(),
            AttributeValue::Float(stats.slope_std_err().unwrap_or(0.0)),
        );
        model.insert(
            "r".to_string(),
            AttributeValue::Float(stats.r().unwrap_or(0.0)),
        );
        model.insert(
            "mse".to_string(),
            AttributeValue::Float(stats.mse().unwrap_or(0.0)),
        );
        model.insert(
            "significance".to_string(),
            AttributeValue::Float(stats.slope_significance().unwrap_or(1.0)),
        );
        model.insert(
            "slope_confidence".to_string(),
            AttributeValue::Float(stats.slope_confidence(CONFIDENCE_LEVEL).unwrap_or(0.0)),
        );
        model.insert(
            "forecast".to_string(),
            AttributeValue::Float(intercept + slope * next_index),
        );

        Some(AttributeValue::Map(model))
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
