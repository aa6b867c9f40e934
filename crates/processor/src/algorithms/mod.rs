//! Algorithm implementations
//!
//! Every computation a processor can run is one variant of the closed
//! [`Algorithm`] sum. A variant owns whatever window state it needs and is
//! dispatched through a single [`Algorithm::evaluate`] call per completed
//! input bundle.
//!
//! # Available algorithms
//!
//! Windowed:
//! - [`Crossing`] - sign of a series crossing over a window of 2 pairs
//! - [`CrossUnder`] - threshold breach over a window of 3 pairs
//! - [`PearsonsCorrelation`] - Pearson's r over a configurable window
//! - [`LinearRegression`] - least-squares fit over a configurable window
//! - [`ForecastSrm`] - regression over the window index with accuracy stats
//! - [`Pipe`] - stateful counter with a capacity-1 window
//!
//! Stateless binary:
//! - [`Arithmetic`] - and/division/multiplication/subtraction,
//!   vector subtraction, production-unit pairing
//!
//! # Example
//!
//! ```rust
//! use octopus_processor::algorithms::{Algorithm, InputBinding, Pipe};
//! use octopus_processor::dispatch::EventBundle;
//! use octopus_types::{AttributeValue, Event};
//!
//! let mut algorithm = Algorithm::Pipe(Pipe::new(InputBinding::new(1, "value")));
//! let bundle = EventBundle::single(1, Event::new("tick"));
//!
//! let first = algorithm.evaluate("counter", &bundle).unwrap();
//! let second = algorithm.evaluate("counter", &bundle).unwrap();
//! assert_eq!(first, Some(AttributeValue::Integer(0)));
//! assert_eq!(second, Some(AttributeValue::Integer(1)));
//! ```

mod arithmetic;
mod correlation;
mod cross_under;
mod crossing;
mod forecast;
mod pipe;
mod regression;

pub use arithmetic::{Arithmetic, BinaryOp};
pub use correlation::PearsonsCorrelation;
pub use cross_under::CrossUnder;
pub use crossing::Crossing;
pub use forecast::ForecastSrm;
pub use pipe::Pipe;
pub use regression::LinearRegression;

use serde::{Deserialize, Serialize};

use octopus_types::AttributeValue;

use crate::dispatch::EventBundle;
use crate::error::Result;
use crate::params::{Constraint, ParameterKind, ParameterSpec, ParameterValue};

/// Resolved binding of one processor input: the input id events arrive on
/// and the upstream attribute read from those events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBinding {
    pub id: u32,
    pub attribute: String,
}

impl InputBinding {
    pub fn new(id: u32, attribute: impl Into<String>) -> Self {
        Self {
            id,
            attribute: attribute.into(),
        }
    }
}

/// Reads a numeric operand from the bundle; `None` when the input has no
/// event this firing or the attribute is absent, null, or non-numeric.
pub(crate) fn numeric_operand(bundle: &EventBundle, binding: &InputBinding) -> Option<f64> {
    bundle.get(binding.id)?.get_f64(&binding.attribute)
}

/// Reads a pair of numeric operands; `None` when either side is unreadable.
pub(crate) fn pair_operands(
    bundle: &EventBundle,
    a: &InputBinding,
    b: &InputBinding,
) -> Option<(f64, f64)> {
    Some((numeric_operand(bundle, a)?, numeric_operand(bundle, b)?))
}

/// The configurable identity of an algorithm, selected on a processor
/// template before compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    Crossing,
    CrossUnder,
    PearsonsCorrelation,
    LinearRegression,
    ForecastSrm,
    Pipe,
    And,
    Division,
    Multiplication,
    Subtraction,
    VectorSubtraction,
    ProductionUnit,
}

impl AlgorithmKind {
    /// Number of inputs the algorithm consumes.
    pub fn arity(&self) -> usize {
        match self {
            AlgorithmKind::ForecastSrm | AlgorithmKind::Pipe => 1,
            _ => 2,
        }
    }

    /// Parameters the algorithm declares on its template.
    pub fn parameter_specs(&self) -> Vec<ParameterSpec> {
        match self {
            AlgorithmKind::PearsonsCorrelation => {
                vec![ParameterSpec::new("window", ParameterKind::Integer)
                    .required()
                    .with_constraint(Constraint::MinInteger(1))]
            }
            AlgorithmKind::LinearRegression => vec![
                ParameterSpec::new("window", ParameterKind::Integer)
                    .required()
                    .with_constraint(Constraint::MinInteger(1)),
                ParameterSpec::new("intercept_name", ParameterKind::Text)
                    .with_default(ParameterValue::Text("intercept".to_string())),
                ParameterSpec::new("slope_name", ParameterKind::Text)
                    .with_default(ParameterValue::Text("slope".to_string())),
            ],
            AlgorithmKind::ForecastSrm => {
                // Slope significance needs n - 2 >= 1 degrees of freedom.
                vec![ParameterSpec::new("window", ParameterKind::Integer)
                    .required()
                    .with_constraint(Constraint::MinInteger(3))]
            }
            _ => Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Crossing => "crossing",
            AlgorithmKind::CrossUnder => "cross_under",
            AlgorithmKind::PearsonsCorrelation => "pearsons_correlation",
            AlgorithmKind::LinearRegression => "linear_regression",
            AlgorithmKind::ForecastSrm => "forecast_srm",
            AlgorithmKind::Pipe => "pipe",
            AlgorithmKind::And => "and",
            AlgorithmKind::Division => "division",
            AlgorithmKind::Multiplication => "multiplication",
            AlgorithmKind::Subtraction => "subtraction",
            AlgorithmKind::VectorSubtraction => "vector_subtraction",
            AlgorithmKind::ProductionUnit => "production_unit",
        }
    }
}

/// A compiled computation: one variant per algorithm, each owning its own
/// window state and resolved input bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Algorithm {
    Crossing(Crossing),
    CrossUnder(CrossUnder),
    PearsonsCorrelation(PearsonsCorrelation),
    LinearRegression(LinearRegression),
    ForecastSrm(ForecastSrm),
    Pipe(Pipe),
    Arithmetic(Arithmetic),
}

impl Algorithm {
    /// Runs one firing over a completed bundle. `Ok(None)` means no output
    /// this firing (window still filling, or a skipped null operand).
    pub fn evaluate(
        &mut self,
        processor: &str,
        bundle: &EventBundle,
    ) -> Result<Option<AttributeValue>> {
        match self {
            Algorithm::Crossing(a) => Ok(a.evaluate(bundle)),
            Algorithm::CrossUnder(a) => Ok(a.evaluate(bundle)),
            Algorithm::PearsonsCorrelation(a) => Ok(a.evaluate(bundle)),
            Algorithm::LinearRegression(a) => Ok(a.evaluate(bundle)),
            Algorithm::ForecastSrm(a) => Ok(a.evaluate(bundle)),
            Algorithm::Pipe(a) => Ok(a.evaluate(bundle)),
            Algorithm::Arithmetic(a) => a.evaluate(processor, bundle),
        }
    }

    /// Drops accumulated window state.
    pub fn reset(&mut self) {
        match self {
            Algorithm::Crossing(a) => a.reset(),
            Algorithm::CrossUnder(a) => a.reset(),
            Algorithm::PearsonsCorrelation(a) => a.reset(),
            Algorithm::LinearRegression(a) => a.reset(),
            Algorithm::ForecastSrm(a) => a.reset(),
            Algorithm::Pipe(a) => a.reset(),
            Algorithm::Arithmetic(_) => {}
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Algorithm::Crossing(_) => AlgorithmKind::Crossing,
            Algorithm::CrossUnder(_) => AlgorithmKind::CrossUnder,
            Algorithm::PearsonsCorrelation(_) => AlgorithmKind::PearsonsCorrelation,
            Algorithm::LinearRegression(_) => AlgorithmKind::LinearRegression,
            Algorithm::ForecastSrm(_) => AlgorithmKind::ForecastSrm,
            Algorithm::Pipe(_) => AlgorithmKind::Pipe,
            Algorithm::Arithmetic(a) => a.op().kind(),
        }
    }
}
