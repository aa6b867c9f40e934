//! Processor templates
//!
//! A [`ProcessorConfig`] is the inert, user-editable description of one
//! processing node: which algorithm runs, the parameters it takes, the
//! inputs it consumes, the joins between those inputs, and the output event
//! each firing produces. Templates carry no runtime state and can be
//! serialized, cloned, and edited freely; [`ProcessorConfig::compile`] turns
//! a validated template into a runnable
//! [`CompiledProcessor`](crate::compiled::CompiledProcessor) whose window
//! state is private to that compilation.
//!
//! # Example
//!
//! ```rust
//! use octopus_processor::algorithms::AlgorithmKind;
//! use octopus_processor::config::ProcessorConfig;
//!
//! let config = ProcessorConfig::new("price_corr", AlgorithmKind::PearsonsCorrelation)
//!     .with_input(1, "price")
//!     .with_input(2, "volume")
//!     .with_join(1, 2)
//!     .with_output("correlation", "r")
//!     .with_parameter("window", "20")
//!     .unwrap();
//!
//! let compiled = config.compile().unwrap();
//! assert_eq!(compiled.name(), "price_corr");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::{
    Algorithm, AlgorithmKind, Arithmetic, BinaryOp, CrossUnder, Crossing, ForecastSrm,
    InputBinding, LinearRegression, PearsonsCorrelation, Pipe,
};
use crate::compiled::CompiledProcessor;
use crate::dispatch::JoinDispatcher;
use crate::error::{ProcessorError, Result};
use crate::params::ParameterSet;

/// One declared input of a processor.
///
/// Events offered to the compiled processor arrive tagged with `id`; the
/// algorithm reads `source_attribute` from events on this input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPort {
    /// Input identifier, unique within the processor and greater than zero.
    pub id: u32,

    /// Attribute name read from events arriving on this input.
    pub source_attribute: String,
}

/// The output surface of a processor.
///
/// Each firing wraps the produced value into a fresh event named
/// `event_name`, stored under the `attribute` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Name of the emitted event type.
    pub event_name: String,

    /// Attribute the produced value is stored under.
    pub attribute: String,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            event_name: String::new(),
            attribute: default_output_attribute(),
        }
    }
}

fn default_output_attribute() -> String {
    "value".to_string()
}

/// A join between two declared inputs.
///
/// Joined inputs fire the algorithm only once every member of the join
/// group holds an event; unjoined inputs fire on every arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub left: u32,
    pub right: u32,
}

/// Template for one processor node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Processor name, unique within a model.
    pub name: String,

    /// Algorithm this processor runs.
    pub kind: AlgorithmKind,

    /// Parameter assignments, seeded from the algorithm's declared specs.
    pub params: ParameterSet,

    /// Declared inputs, one per operand the algorithm consumes.
    #[serde(default)]
    pub inputs: Vec<InputPort>,

    /// Output event produced on each firing.
    #[serde(default)]
    pub output: Output,

    /// Join groups over the declared inputs.
    #[serde(default)]
    pub joins: Vec<Join>,
}

impl ProcessorConfig {
    /// Creates a template for the given algorithm with its parameter specs
    /// seeded and everything else empty.
    pub fn new(name: impl Into<String>, kind: AlgorithmKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: ParameterSet::new(kind.parameter_specs()),
            inputs: Vec::new(),
            output: Output::default(),
            joins: Vec::new(),
        }
    }

    /// Declares an input port.
    pub fn with_input(mut self, id: u32, source_attribute: impl Into<String>) -> Self {
        self.inputs.push(InputPort {
            id,
            source_attribute: source_attribute.into(),
        });
        self
    }

    /// Sets the output event name and attribute.
    pub fn with_output(
        mut self,
        event_name: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.output = Output {
            event_name: event_name.into(),
            attribute: attribute.into(),
        };
        self
    }

    /// Joins two declared inputs.
    pub fn with_join(mut self, left: u32, right: u32) -> Self {
        self.joins.push(Join { left, right });
        self
    }

    /// Assigns a parameter from its raw text value, builder style.
    /// Conversion and constraint failures surface here, at assignment time.
    pub fn with_parameter(mut self, name: &str, raw: &str) -> Result<Self> {
        self.params.set(name, raw)?;
        Ok(self)
    }

    /// Assigns a parameter in place. Same conversion and constraint checks
    /// as [`ProcessorConfig::with_parameter`].
    pub fn set_param(&mut self, name: &str, raw: &str) -> Result<()> {
        self.params.set(name, raw)?;
        Ok(())
    }

    /// Checks the template against the algorithm's requirements, reporting
    /// the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ProcessorError::configuration(
                &self.name,
                "name",
                "must not be empty",
            ));
        }

        let arity = self.kind.arity();
        if self.inputs.len() != arity {
            return Err(ProcessorError::configuration(
                &self.name,
                "inputs",
                format!(
                    "{} takes {} input(s), {} declared",
                    self.kind.name(),
                    arity,
                    self.inputs.len()
                ),
            ));
        }

        for (index, port) in self.inputs.iter().enumerate() {
            if port.id == 0 {
                return Err(ProcessorError::configuration(
                    &self.name,
                    format!("inputs[{}].id", index),
                    "must be greater than zero",
                ));
            }
            if self.inputs[..index].iter().any(|p| p.id == port.id) {
                return Err(ProcessorError::configuration(
                    &self.name,
                    format!("inputs[{}].id", index),
                    format!("duplicate input id {}", port.id),
                ));
            }
            if port.source_attribute.is_empty() {
                return Err(ProcessorError::configuration(
                    &self.name,
                    format!("inputs[{}].source_attribute", index),
                    "must not be empty",
                ));
            }
        }

        if self.output.event_name.is_empty() {
            return Err(ProcessorError::configuration(
                &self.name,
                "output.event_name",
                "must not be empty",
            ));
        }
        if self.output.attribute.is_empty() {
            return Err(ProcessorError::configuration(
                &self.name,
                "output.attribute",
                "must not be empty",
            ));
        }

        self.params.validate()?;

        for (index, join) in self.joins.iter().enumerate() {
            if join.left == join.right {
                return Err(ProcessorError::configuration(
                    &self.name,
                    format!("joins[{}]", index),
                    "left and right must differ",
                ));
            }
            for end in [join.left, join.right] {
                if !self.inputs.iter().any(|p| p.id == end) {
                    return Err(ProcessorError::configuration(
                        &self.name,
                        format!("joins[{}]", index),
                        format!("references undeclared input {}", end),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Compiles the template into a runnable processor.
    ///
    /// Compilation validates first, then snapshots every setting into the
    /// returned unit. The compiled processor shares no state with this
    /// template or with sibling compilations: editing the template or
    /// compiling it again never disturbs units already running.
    pub fn compile(&self) -> Result<CompiledProcessor> {
        self.validate()?;

        // Operand order is positional by ascending input id.
        let mut ports = self.inputs.clone();
        ports.sort_by_key(|p| p.id);
        let bindings: Vec<InputBinding> = ports
            .iter()
            .map(|p| InputBinding::new(p.id, p.source_attribute.clone()))
            .collect();

        let algorithm = self.build_algorithm(&bindings)?;
        let dispatcher = JoinDispatcher::new(self.joins.iter().flat_map(|j| [j.left, j.right]));
        let input_ids = ports.iter().map(|p| p.id);

        debug!(
            processor = %self.name,
            algorithm = self.kind.name(),
            inputs = ports.len(),
            joins = self.joins.len(),
            "compiled processor"
        );

        Ok(CompiledProcessor::new(
            self.name.clone(),
            algorithm,
            dispatcher,
            input_ids,
            self.output.clone(),
        ))
    }

    fn build_algorithm(&self, bindings: &[InputBinding]) -> Result<Algorithm> {
        let window = || -> Result<usize> { Ok(self.params.get_i64("window")? as usize) };

        let algorithm = match (self.kind, bindings) {
            (AlgorithmKind::Crossing, [a, b]) => {
                Algorithm::Crossing(Crossing::new(a.clone(), b.clone()))
            }
            (AlgorithmKind::CrossUnder, [a, b]) => {
                Algorithm::CrossUnder(CrossUnder::new(a.clone(), b.clone()))
            }
            (AlgorithmKind::PearsonsCorrelation, [a, b]) => Algorithm::PearsonsCorrelation(
                PearsonsCorrelation::new(a.clone(), b.clone(), window()?),
            ),
            (AlgorithmKind::LinearRegression, [x, y]) => {
                Algorithm::LinearRegression(LinearRegression::new(
                    x.clone(),
                    y.clone(),
                    window()?,
                    self.params.get_text("intercept_name")?,
                    self.params.get_text("slope_name")?,
                ))
            }
            (AlgorithmKind::ForecastSrm, [input]) => {
                Algorithm::ForecastSrm(ForecastSrm::new(input.clone(), window()?))
            }
            (AlgorithmKind::Pipe, [input]) => Algorithm::Pipe(Pipe::new(input.clone())),
            (AlgorithmKind::And, [a, b]) => {
                Algorithm::Arithmetic(Arithmetic::new(BinaryOp::And, a.clone(), b.clone()))
            }
            (AlgorithmKind::Division, [a, b]) => {
                Algorithm::Arithmetic(Arithmetic::new(BinaryOp::Division, a.clone(), b.clone()))
            }
            (AlgorithmKind::Multiplication, [a, b]) => Algorithm::Arithmetic(Arithmetic::new(
                BinaryOp::Multiplication,
                a.clone(),
                b.clone(),
            )),
            (AlgorithmKind::Subtraction, [a, b]) => {
                Algorithm::Arithmetic(Arithmetic::new(BinaryOp::Subtraction, a.clone(), b.clone()))
            }
            (AlgorithmKind::VectorSubtraction, [a, b]) => Algorithm::Arithmetic(Arithmetic::new(
                BinaryOp::VectorSubtraction,
                a.clone(),
                b.clone(),
            )),
            (AlgorithmKind::ProductionUnit, [a, b]) => Algorithm::Arithmetic(Arithmetic::new(
                BinaryOp::ProductionUnit,
                a.clone(),
                b.clone(),
            )),
            _ => {
                return Err(ProcessorError::configuration(
                    &self.name,
                    "inputs",
                    "input count does not match algorithm arity",
                ))
            }
        };

        Ok(algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octopus_types::{AttributeValue, Event};

    fn division_config() -> ProcessorConfig {
        ProcessorConfig::new("div", AlgorithmKind::Division)
            .with_input(1, "a")
            .with_input(2, "b")
            .with_join(1, 2)
            .with_output("quotient", "value")
    }

    #[test]
    fn test_valid_config_compiles() {
        let compiled = division_config().compile().unwrap();
        assert_eq!(compiled.name(), "div");
        assert_eq!(compiled.kind(), AlgorithmKind::Division);
    }

    #[test]
    fn test_empty_name_rejected() {
        let config = ProcessorConfig::new("", AlgorithmKind::Division)
            .with_input(1, "a")
            .with_input(2, "b")
            .with_output("out", "value");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let config = ProcessorConfig::new("div", AlgorithmKind::Division)
            .with_input(1, "a")
            .with_output("out", "value");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'inputs'"));
        assert!(err.to_string().contains("2 input(s)"));
    }

    #[test]
    fn test_zero_input_id_rejected() {
        let config = ProcessorConfig::new("div", AlgorithmKind::Division)
            .with_input(0, "a")
            .with_input(2, "b")
            .with_output("out", "value");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inputs[0].id"));
    }

    #[test]
    fn test_duplicate_input_id_rejected() {
        let config = ProcessorConfig::new("div", AlgorithmKind::Division)
            .with_input(1, "a")
            .with_input(1, "b")
            .with_output("out", "value");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate input id 1"));
    }

    #[test]
    fn test_empty_source_attribute_rejected() {
        let config = ProcessorConfig::new("div", AlgorithmKind::Division)
            .with_input(1, "")
            .with_input(2, "b")
            .with_output("out", "value");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inputs[0].source_attribute"));
    }

    #[test]
    fn test_missing_output_event_name_rejected() {
        let config = ProcessorConfig::new("div", AlgorithmKind::Division)
            .with_input(1, "a")
            .with_input(2, "b");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.event_name"));
    }

    #[test]
    fn test_missing_required_parameter_rejected() {
        let config = ProcessorConfig::new("corr", AlgorithmKind::PearsonsCorrelation)
            .with_input(1, "x")
            .with_input(2, "y")
            .with_output("out", "r");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_window_constraint_checked_at_assignment() {
        let mut config = ProcessorConfig::new("corr", AlgorithmKind::PearsonsCorrelation);
        let err = config.set_param("window", "0").unwrap_err();
        assert!(matches!(err, ProcessorError::Parameter(_)));
    }

    #[test]
    fn test_with_parameter_builds_a_complete_template() {
        let compiled = ProcessorConfig::new("corr", AlgorithmKind::PearsonsCorrelation)
            .with_input(1, "x")
            .with_input(2, "y")
            .with_join(1, 2)
            .with_output("correlation", "r")
            .with_parameter("window", "10")
            .unwrap()
            .compile()
            .unwrap();
        assert_eq!(compiled.kind(), AlgorithmKind::PearsonsCorrelation);
    }

    #[test]
    fn test_join_referencing_undeclared_input_rejected() {
        let config = division_config().with_join(1, 3);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared input 3"));
    }

    #[test]
    fn test_self_join_rejected() {
        let config = division_config().with_join(2, 2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("left and right must differ"));
    }

    #[test]
    fn test_compilations_are_independent() {
        let mut config = ProcessorConfig::new("counter", AlgorithmKind::Pipe)
            .with_input(1, "tick")
            .with_output("count", "value");

        let mut first = config.compile().unwrap();
        let event = Event::new("tick");
        first.offer(1, event.clone()).unwrap();
        first.offer(1, event.clone()).unwrap();

        // A later compile starts from zero and does not disturb the first.
        config.name = "counter_b".to_string();
        let mut second = config.compile().unwrap();
        let out = second.offer(1, event.clone()).unwrap().unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Integer(0)));

        let out = first.offer(1, event).unwrap().unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Integer(2)));
    }

    #[test]
    fn test_operands_ordered_by_input_id() {
        // Declared out of order; operand a must still come from id 1.
        let mut compiled = ProcessorConfig::new("sub", AlgorithmKind::Subtraction)
            .with_input(2, "b")
            .with_input(1, "a")
            .with_join(1, 2)
            .with_output("difference", "value")
            .compile()
            .unwrap();

        compiled
            .offer(1, Event::new("left").with_attribute("a", 10.0))
            .unwrap();
        let out = compiled
            .offer(2, Event::new("right").with_attribute("b", 4.0))
            .unwrap()
            .unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Float(6.0)));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = division_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: ProcessorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, config.name);
        assert_eq!(back.inputs, config.inputs);
        assert_eq!(back.output, config.output);
    }
}
