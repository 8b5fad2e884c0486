//! Methods and the inline-or-`$ref` unions they are built from.

use crate::{
    ContentDescriptor, ErrorObject, ExamplePairing, Extensions, ExternalDocumentation, Link,
    Reference, Server, Tag,
};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// One callable method or server notification.
///
/// A method with a `result` is a request the client may call. A method without
/// one is a notification the server sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Method {
    /// Sent verbatim as the JSON-RPC `method`
    #[builder(into)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagOrReference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    /// Positional on the wire, in this order
    #[serde(default)]
    #[builder(default)]
    pub params: Vec<ContentDescriptorOrReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ContentDescriptorOrReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorOrReference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkOrReference>>,

    /// Parsed but not enforced; arguments are always sent by position
    #[serde(rename = "paramStructure", skip_serializing_if = "Option::is_none")]
    pub param_structure: Option<ParameterStructure>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<ExamplePairingOrReference>>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

// Reference comes first in every union below: the object variants accept
// unknown keys through their flattened extensions and would swallow `$ref`.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagOrReference {
    Reference(Reference),
    Tag(Tag),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentDescriptorOrReference {
    Reference(Reference),
    ContentDescriptor(ContentDescriptor),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorOrReference {
    Reference(Reference),
    Error(ErrorObject),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkOrReference {
    Reference(Reference),
    Link(Link),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExamplePairingOrReference {
    Reference(Reference),
    ExamplePairing(ExamplePairing),
}

/// How arguments may be structured on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterStructure {
    ByName,
    ByPosition,
    Either,
}

impl Method {
    pub fn new(name: impl Into<String>, params: Vec<ContentDescriptorOrReference>) -> Self {
        Self::builder().name(name).params(params).build()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_result(mut self, result: impl Into<ContentDescriptorOrReference>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<ErrorOrReference>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(error.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<TagOrReference>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    /// Add an extension field
    pub fn with_extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extensions.insert(key, value);
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }

    /// Methods without a result can only arrive from the server
    pub fn is_notification(&self) -> bool {
        self.result.is_none()
    }
}

impl From<ContentDescriptor> for ContentDescriptorOrReference {
    fn from(descriptor: ContentDescriptor) -> Self {
        ContentDescriptorOrReference::ContentDescriptor(descriptor)
    }
}

impl From<Reference> for ContentDescriptorOrReference {
    fn from(reference: Reference) -> Self {
        ContentDescriptorOrReference::Reference(reference)
    }
}

impl From<ErrorObject> for ErrorOrReference {
    fn from(error: ErrorObject) -> Self {
        ErrorOrReference::Error(error)
    }
}

impl From<Reference> for ErrorOrReference {
    fn from(reference: Reference) -> Self {
        ErrorOrReference::Reference(reference)
    }
}

impl From<Tag> for TagOrReference {
    fn from(tag: Tag) -> Self {
        TagOrReference::Tag(tag)
    }
}

impl From<Reference> for TagOrReference {
    fn from(reference: Reference) -> Self {
        TagOrReference::Reference(reference)
    }
}
