//! Core types for the Octopus event-processing model builder
//!
//! This crate provides the fundamental data structures shared across the
//! workspace: events, attribute values, and event type schemas.

pub mod errors;
pub mod event;
pub mod schema;

pub use errors::{Result, SchemaError};
pub use event::{AttributeValue, Event};
pub use schema::{Attribute, AttributeType, EventType};
