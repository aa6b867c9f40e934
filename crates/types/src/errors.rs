//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while validating event type schemas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("event type '{event_type}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute {
        event_type: String,
        attribute: String,
    },
}
