//! Error types for processor compilation and evaluation
//!
//! Compile-time failures (validation, wiring, parameter conversion) surface
//! as errors that name the processor and the offending field. Runtime data
//! problems are not errors at all: arithmetic algorithms coerce null operands
//! and statistical algorithms skip the firing, logging through `tracing`
//! instead of failing the stream.

use thiserror::Error;

/// Main error type for processor and model operations
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Template validation failures at compile time
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Parameter conversion or constraint failures
    #[error("parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Runtime type mismatch that must propagate
    #[error("unsupported type in processor '{processor}': attribute '{attribute}' expected {expected}, got {actual}")]
    UnsupportedType {
        processor: String,
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Event offered on an input id the processor does not declare
    #[error("unknown input '{input}' on processor '{processor}'")]
    UnknownInput { processor: String, input: String },

    /// Model wiring failures
    #[error("connection error: {message}")]
    Connection { message: String },

    /// Serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Generic error for unexpected conditions
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ProcessorError {
    /// Builds a configuration error naming the processor, the field, and the
    /// reason, so callers can locate the offending template entry.
    pub fn configuration(
        processor: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ProcessorError::Configuration {
            message: format!(
                "processor '{}', field '{}': {}",
                processor.into(),
                field.into(),
                reason.into()
            ),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        ProcessorError::Connection {
            message: message.into(),
        }
    }
}

/// Parameter conversion and constraint errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Raw text does not parse as the declared kind
    #[error("parameter '{parameter}': cannot convert '{value}' to {expected}")]
    Conversion {
        parameter: String,
        value: String,
        expected: String,
    },

    /// Parsed value violates a declared constraint
    #[error("parameter '{parameter}': value {value} violates constraint {constraint}")]
    Constraint {
        parameter: String,
        value: String,
        constraint: String,
    },

    /// Required parameter never assigned and without a default
    #[error("parameter '{parameter}' is required but was not set")]
    Missing { parameter: String },

    /// Assignment to a parameter the processor does not declare
    #[error("unknown parameter '{parameter}'")]
    Unknown { parameter: String },
}

/// Result type alias for processor operations
pub type Result<T> = std::result::Result<T, ProcessorError>;

/// Result type alias for parameter operations
pub type ParameterResult<T> = std::result::Result<T, ParameterError>;

impl From<serde_json::Error> for ProcessorError {
    fn from(err: serde_json::Error) -> Self {
        ProcessorError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for ProcessorError {
    fn from(err: anyhow::Error) -> Self {
        ProcessorError::Unexpected(err.to_string())
    }
}
