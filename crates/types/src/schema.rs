//! Event type schemas
//!
//! An [`EventType`] declares the attributes an event of that type carries.
//! Schemas describe the shape of the data flowing along a model edge; port
//! compatibility checks compare event type names, and algorithms read the
//! attributes the schema declares.

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// The declared type of a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Boolean,
    Integer,
    Float,
    Text,
    Array,
    Map,
}

/// A named, typed attribute declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, unique within its event type
    pub name: String,
    /// Declared value type
    pub attribute_type: AttributeType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }
}

/// Schema of one kind of event: a type name and its attribute declarations.
///
/// # Example
///
/// ```rust
/// use octopus_types::{AttributeType, EventType};
///
/// let schema = EventType::new("reading")
///     .with_attribute("sensor", AttributeType::Text)
///     .with_attribute("value", AttributeType::Float);
///
/// assert!(schema.validate().is_ok());
/// assert_eq!(schema.attribute("value").unwrap().attribute_type, AttributeType::Float);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    /// Event type name
    pub name: String,
    /// Attribute declarations, in declaration order
    pub attributes: Vec<Attribute>,
}

impl EventType {
    /// Creates a schema with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute declaration, builder style.
    pub fn with_attribute(mut self, name: impl Into<String>, attribute_type: AttributeType) -> Self {
        self.attributes.push(Attribute::new(name, attribute_type));
        self
    }

    /// Looks up an attribute declaration by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Checks the schema for duplicate attribute names.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, attribute) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.name == attribute.name) {
                return Err(SchemaError::DuplicateAttribute {
                    event_type: self.name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
        }
        Ok(())
    }
}
