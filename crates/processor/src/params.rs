//! Typed processor parameters with declared constraints
//!
//! Each processor template carries a [`ParameterSet`]: the specs an algorithm
//! declares (name, kind, required flag, default, constraints) plus whatever
//! values the model author assigned. Assignment converts and constraint-checks
//! eagerly, so a bad value fails at the point it is written with an error that
//! names the parameter; `validate` at compile time only has to check that
//! required parameters were assigned at all.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ParameterError, ParameterResult};

/// The kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Integer,
    Float,
    Text,
    Boolean,
}

impl ParameterKind {
    fn name(&self) -> &'static str {
        match self {
            ParameterKind::Integer => "integer",
            ParameterKind::Float => "float",
            ParameterKind::Text => "text",
            ParameterKind::Boolean => "boolean",
        }
    }
}

/// A constraint on assigned parameter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    MinInteger(i64),
    MaxInteger(i64),
    MinFloat(f64),
    MaxFloat(f64),
    OneOf(Vec<String>),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::MinInteger(min) => write!(f, "min {}", min),
            Constraint::MaxInteger(max) => write!(f, "max {}", max),
            Constraint::MinFloat(min) => write!(f, "min {}", min),
            Constraint::MaxFloat(max) => write!(f, "max {}", max),
            Constraint::OneOf(options) => write!(f, "one of {:?}", options),
        }
    }
}

impl Constraint {
    fn check(&self, parameter: &str, value: &ParameterValue) -> ParameterResult<()> {
        let ok = match (self, value) {
            (Constraint::MinInteger(min), ParameterValue::Integer(i)) => i >= min,
            (Constraint::MaxInteger(max), ParameterValue::Integer(i)) => i <= max,
            (Constraint::MinFloat(min), ParameterValue::Float(v)) => v >= min,
            (Constraint::MaxFloat(max), ParameterValue::Float(v)) => v <= max,
            (Constraint::OneOf(options), ParameterValue::Text(s)) => options.contains(s),
            // Constraint kinds that do not apply to the value kind pass.
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ParameterError::Constraint {
                parameter: parameter.to_string(),
                value: value.to_string(),
                constraint: self.to_string(),
            })
        }
    }
}

/// An assigned parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Integer(i) => write!(f, "{}", i),
            ParameterValue::Float(v) => write!(f, "{}", v),
            ParameterValue::Text(s) => write!(f, "{}", s),
            ParameterValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl ParameterValue {
    fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Integer(_) => ParameterKind::Integer,
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::Text(_) => ParameterKind::Text,
            ParameterValue::Boolean(_) => ParameterKind::Boolean,
        }
    }

    fn parse(parameter: &str, kind: ParameterKind, raw: &str) -> ParameterResult<Self> {
        let conversion = || ParameterError::Conversion {
            parameter: parameter.to_string(),
            value: raw.to_string(),
            expected: kind.name().to_string(),
        };
        match kind {
            ParameterKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(ParameterValue::Integer)
                .map_err(|_| conversion()),
            ParameterKind::Float => raw
                .trim()
                .parse::<f64>()
                .map(ParameterValue::Float)
                .map_err(|_| conversion()),
            ParameterKind::Boolean => raw
                .trim()
                .parse::<bool>()
                .map(ParameterValue::Boolean)
                .map_err(|_| conversion()),
            ParameterKind::Text => Ok(ParameterValue::Text(raw.to_string())),
        }
    }
}

/// Declaration of one parameter: what it accepts and what it requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub required: bool,
    pub default: Option<ParameterValue>,
    pub constraints: Vec<Constraint>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: ParameterValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// The declared specs of a processor plus the values assigned so far.
///
/// # Example
///
/// ```rust
/// use octopus_processor::params::{Constraint, ParameterKind, ParameterSet, ParameterSpec};
///
/// let mut params = ParameterSet::new(vec![ParameterSpec::new(
///     "window",
///     ParameterKind::Integer,
/// )
/// .required()
/// .with_constraint(Constraint::MinInteger(1))]);
///
/// params.set("window", "20").unwrap();
/// assert_eq!(params.get_i64("window").unwrap(), 20);
/// assert!(params.set("window", "0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParameterSet {
    specs: Vec<ParameterSpec>,
    values: HashMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new(specs: Vec<ParameterSpec>) -> Self {
        Self {
            specs,
            values: HashMap::new(),
        }
    }

    fn spec(&self, name: &str) -> ParameterResult<&ParameterSpec> {
        self.specs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ParameterError::Unknown {
                parameter: name.to_string(),
            })
    }

    /// Parses raw text per the spec's kind, constraint-checks, and stores.
    pub fn set(&mut self, name: &str, raw: &str) -> ParameterResult<()> {
        let spec = self.spec(name)?;
        let value = ParameterValue::parse(name, spec.kind, raw)?;
        self.set_value(name, value)
    }

    /// Stores a pre-typed value after kind and constraint checks.
    pub fn set_value(&mut self, name: &str, value: ParameterValue) -> ParameterResult<()> {
        let spec = self.spec(name)?;
        if value.kind() != spec.kind {
            return Err(ParameterError::Conversion {
                parameter: name.to_string(),
                value: value.to_string(),
                expected: spec.kind.name().to_string(),
            });
        }
        for constraint in &spec.constraints {
            constraint.check(name, &value)?;
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn resolved(&self, name: &str) -> ParameterResult<&ParameterValue> {
        let spec = self.spec(name)?;
        self.values
            .get(name)
            .or(spec.default.as_ref())
            .ok_or_else(|| ParameterError::Missing {
                parameter: name.to_string(),
            })
    }

    pub fn get_i64(&self, name: &str) -> ParameterResult<i64> {
        match self.resolved(name)? {
            ParameterValue::Integer(i) => Ok(*i),
            other => Err(ParameterError::Conversion {
                parameter: name.to_string(),
                value: other.to_string(),
                expected: "integer".to_string(),
            }),
        }
    }

    pub fn get_f64(&self, name: &str) -> ParameterResult<f64> {
        match self.resolved(name)? {
            ParameterValue::Integer(i) => Ok(*i as f64),
            ParameterValue::Float(v) => Ok(*v),
            other => Err(ParameterError::Conversion {
                parameter: name.to_string(),
                value: other.to_string(),
                expected: "float".to_string(),
            }),
        }
    }

    pub fn get_text(&self, name: &str) -> ParameterResult<&str> {
        match self.resolved(name)? {
            ParameterValue::Text(s) => Ok(s),
            other => Err(ParameterError::Conversion {
                parameter: name.to_string(),
                value: other.to_string(),
                expected: "text".to_string(),
            }),
        }
    }

    pub fn get_bool(&self, name: &str) -> ParameterResult<bool> {
        match self.resolved(name)? {
            ParameterValue::Boolean(b) => Ok(*b),
            other => Err(ParameterError::Conversion {
                parameter: name.to_string(),
                value: other.to_string(),
                expected: "boolean".to_string(),
            }),
        }
    }

    /// Checks that every required parameter is assigned or defaulted.
    pub fn validate(&self) -> ParameterResult<()> {
        for spec in &self.specs {
            if spec.required && spec.default.is_none() && !self.values.contains_key(&spec.name) {
                return Err(ParameterError::Missing {
                    parameter: spec.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Declared specs, in declaration order.
    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }
}
