//! Examples and example pairings.
//!
//! These are documentation only; nothing in the resolver or the client reads them.

use crate::{Extensions, Reference};
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A sample value for a parameter or result. Either `value` or
/// `external_value` is set, never both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Example {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Example {
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self::builder().value(value.into()).build()
    }
}

/// Example arguments for a method together with the result they produce.
/// `result` is absent for notification methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ExamplePairing {
    #[builder(into)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    #[builder(default)]
    pub params: Vec<ExampleOrReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExampleOrReference>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

/// Reference is tried first: a flattened extension map would otherwise swallow `$ref`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExampleOrReference {
    Reference(Reference),
    Example(Box<Example>),
}

impl ExamplePairing {
    pub fn new(name: impl Into<String>, params: Vec<ExampleOrReference>) -> Self {
        Self::builder().name(name).params(params).build()
    }

    pub fn with_result(mut self, result: impl Into<ExampleOrReference>) -> Self {
        self.result = Some(result.into());
        self
    }
}

impl From<Example> for ExampleOrReference {
    fn from(example: Example) -> Self {
        ExampleOrReference::Example(Box::new(example))
    }
}

impl From<Reference> for ExampleOrReference {
    fn from(reference: Reference) -> Self {
        ExampleOrReference::Reference(reference)
    }
}
