//! Content Descriptor Object.

use crate::{Extensions, Reference};
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content Descriptors describe a method parameter or a method result.
/// They MUST have a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ContentDescriptor {
    /// Name of the content that is being described.
    pub name: String,

    /// A short summary of the content that is being described.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A verbose explanation of the content descriptor behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Determines if the content is a required field. Absent means false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Schema-like value that describes the content. Kept raw; see [`crate::SchemaForm`].
    pub schema: Value,

    /// Specifies that the content is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl ContentDescriptor {
    /// Create a new ContentDescriptor with required fields
    pub fn new(name: impl Into<String>, schema: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            summary: None,
            description: None,
            required: None,
            schema: schema.into(),
            deprecated: None,
            extensions: Extensions::new(),
        }
    }

    /// Create a new ContentDescriptor whose schema is a reference
    pub fn with_reference(name: impl Into<String>, reference: Reference) -> Self {
        let schema = serde_json::json!({ "$ref": reference.reference });
        Self::new(name, schema)
    }

    /// Mark the content as required (or not)
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the content is required, treating an absent flag as false
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}
