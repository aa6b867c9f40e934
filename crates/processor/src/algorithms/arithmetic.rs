//! Stateless binary operations over two joined operands
//!
//! One struct covers the whole arithmetic family; the [`BinaryOp`] tag picks
//! the computation. Data problems degrade instead of failing: a null or
//! missing operand coerces to 0 (false for `And`, an empty vector for
//! `VectorSubtraction`), and division by zero yields 0. An operand of a type
//! the operation cannot coerce is a configuration bug and surfaces as an
//! `UnsupportedType` error.

use serde::{Deserialize, Serialize};

use octopus_types::AttributeValue;

use super::{AlgorithmKind, InputBinding};
use crate::dispatch::EventBundle;
use crate::error::{ProcessorError, Result};

/// The computation an [`Arithmetic`] instance performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    And,
    Division,
    Multiplication,
    Subtraction,
    VectorSubtraction,
    ProductionUnit,
}

impl BinaryOp {
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            BinaryOp::And => AlgorithmKind::And,
            BinaryOp::Division => AlgorithmKind::Division,
            BinaryOp::Multiplication => AlgorithmKind::Multiplication,
            BinaryOp::Subtraction => AlgorithmKind::Subtraction,
            BinaryOp::VectorSubtraction => AlgorithmKind::VectorSubtraction,
            BinaryOp::ProductionUnit => AlgorithmKind::ProductionUnit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arithmetic {
    op: BinaryOp,
    a: InputBinding,
    b: InputBinding,
}

impl Arithmetic {
    pub fn new(op: BinaryOp, a: InputBinding, b: InputBinding) -> Self {
        Self { op, a, b }
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    /// Computes the operation over the bundle. Always produces a value.
    pub fn evaluate(
        &self,
        processor: &str,
        bundle: &EventBundle,
    ) -> Result<Option<AttributeValue>> {
        let value = match self.op {
            BinaryOp::And => {
                let a = self.boolean_operand(processor, bundle, &self.a)?;
                let b = self.boolean_operand(processor, bundle, &self.b)?;
                AttributeValue::Boolean(a && b)
            }
            BinaryOp::Division => {
                let a = self.numeric_operand(processor, bundle, &self.a)?;
                let b = self.numeric_operand(processor, bundle, &self.b)?;
                // Division by zero is defined as zero, never a panic or inf.
                AttributeValue::Float(if b == 0.0 { 0.0 } else { a / b })
            }
            BinaryOp::Multiplication => {
                let a = self.numeric_operand(processor, bundle, &self.a)?;
                let b = self.numeric_operand(processor, bundle, &self.b)?;
                AttributeValue::Float(a * b)
            }
            BinaryOp::Subtraction => {
                let a = self.numeric_operand(processor, bundle, &self.a)?;
                let b = self.numeric_operand(processor, bundle, &self.b)?;
                AttributeValue::Float(a - b)
            }
            BinaryOp::ProductionUnit => {
                let a = self.numeric_operand(processor, bundle, &self.a)?;
                let b = self.numeric_operand(processor, bundle, &self.b)?;
                AttributeValue::Float(a.min(b))
            }
            BinaryOp::VectorSubtraction => {
                let a = self.vector_operand(processor, bundle, &self.a)?;
                let b = self.vector_operand(processor, bundle, &self.b)?;
                let len = a.len().max(b.len());
                let difference = (0..len)
                    .map(|i| {
                        let left = a.get(i).copied().unwrap_or(0.0);
                        let right = b.get(i).copied().unwrap_or(0.0);
                        AttributeValue::Float(left - right)
                    })
                    .collect();
                AttributeValue::Array(difference)
            }
        };
        Ok(Some(value))
    }

    fn unsupported(
        &self,
        processor: &str,
        binding: &InputBinding,
        expected: &str,
        actual: &AttributeValue,
    ) -> ProcessorError {
        ProcessorError::UnsupportedType {
            processor: processor.to_string(),
            attribute: binding.attribute.clone(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    fn numeric_operand(
        &self,
        processor: &str,
        bundle: &EventBundle,
        binding: &InputBinding,
    ) -> Result<f64> {
        match bundle
            .get(binding.id)
            .and_then(|event| event.get(&binding.attribute))
        {
            None | Some(AttributeValue::Null) => Ok(0.0),
            Some(value) => value
                .as_f64()
                .ok_or_else(|| self.unsupported(processor, binding, "numeric", value)),
        }
    }

    fn boolean_operand(
        &self,
        processor: &str,
        bundle: &EventBundle,
        binding: &InputBinding,
    ) -> Result<bool> {
        match bundle
            .get(binding.id)
            .and_then(|event| event.get(&binding.attribute))
        {
            None | Some(AttributeValue::Null) => Ok(false),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| self.unsupported(processor, binding, "boolean", value)),
        }
    }

    fn vector_operand(
        &self,
        processor: &str,
        bundle: &EventBundle,
        binding: &InputBinding,
    ) -> Result<Vec<f64>> {
        match bundle
            .get(binding.id)
            .and_then(|event| event.get(&binding.attribute))
        {
            None | Some(AttributeValue::Null) => Ok(Vec::new()),
            Some(AttributeValue::Array(items)) => items
                .iter()
                .map(|item| match item {
                    AttributeValue::Null => Ok(0.0),
                    other => other
                        .as_f64()
                        .ok_or_else(|| self.unsupported(processor, binding, "numeric", other)),
                })
                .collect(),
            Some(value) => value
                .as_f64()
                .map(|v| vec![v])
                .ok_or_else(|| self.unsupported(processor, binding, "numeric array", value)),
        }
    }
}
