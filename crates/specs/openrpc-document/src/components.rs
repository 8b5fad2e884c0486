//! Components Object: the reusable objects `$ref`s point at.

use crate::{
    ContentDescriptor, ErrorObject, Example, ExamplePairing, Extensions, Link, Tag,
};
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Holds a set of reusable objects for different aspects of the OpenRPC document.
/// Nothing in here has an effect on the API unless it is referenced from outside.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Components {
    /// Reusable Content Descriptor Objects.
    #[serde(rename = "contentDescriptors", skip_serializing_if = "Option::is_none")]
    pub content_descriptors: Option<HashMap<String, ContentDescriptor>>,

    /// Reusable schema-like values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<HashMap<String, Value>>,

    /// Reusable Example Objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<HashMap<String, Example>>,

    /// Reusable Link Objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<HashMap<String, Link>>,

    /// Reusable Error Objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, ErrorObject>>,

    /// Reusable Example Pairing Objects.
    #[serde(
        rename = "examplePairings",
        alias = "examplePairingObjects",
        skip_serializing_if = "Option::is_none"
    )]
    pub example_pairings: Option<HashMap<String, ExamplePairing>>,

    /// Reusable Tag Objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, Tag>>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

/// The component categories a reference may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Schemas,
    ContentDescriptors,
    Errors,
    Examples,
    ExamplePairings,
    Links,
    Tags,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::Schemas,
        ComponentKind::ContentDescriptors,
        ComponentKind::Errors,
        ComponentKind::Examples,
        ComponentKind::ExamplePairings,
        ComponentKind::Links,
        ComponentKind::Tags,
    ];

    /// The canonical path segment used in `#/components/<segment>/<name>`
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Schemas => "schemas",
            ComponentKind::ContentDescriptors => "contentDescriptors",
            ComponentKind::Errors => "errors",
            ComponentKind::Examples => "examples",
            ComponentKind::ExamplePairings => "examplePairings",
            ComponentKind::Links => "links",
            ComponentKind::Tags => "tags",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a path segment is not one of the seven categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComponentKind(pub String);

impl fmt::Display for UnknownComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component type '{}'", self.0)
    }
}

impl std::error::Error for UnknownComponentKind {}

impl FromStr for ComponentKind {
    type Err = UnknownComponentKind;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == segment)
            .ok_or_else(|| UnknownComponentKind(segment.to_string()))
    }
}

/// A component borrowed out of a document, tagged with its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component<'a> {
    Schema(&'a Value),
    ContentDescriptor(&'a ContentDescriptor),
    Error(&'a ErrorObject),
    Example(&'a Example),
    ExamplePairing(&'a ExamplePairing),
    Link(&'a Link),
    Tag(&'a Tag),
}

impl Component<'_> {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Schema(_) => ComponentKind::Schemas,
            Component::ContentDescriptor(_) => ComponentKind::ContentDescriptors,
            Component::Error(_) => ComponentKind::Errors,
            Component::Example(_) => ComponentKind::Examples,
            Component::ExamplePairing(_) => ComponentKind::ExamplePairings,
            Component::Link(_) => ComponentKind::Links,
            Component::Tag(_) => ComponentKind::Tags,
        }
    }
}

impl Components {
    /// Create a new empty Components object
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema
    pub fn with_schema(mut self, name: impl Into<String>, schema: impl Into<Value>) -> Self {
        self.schemas
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), schema.into());
        self
    }

    /// Add a content descriptor
    pub fn with_content_descriptor(
        mut self,
        name: impl Into<String>,
        content_descriptor: ContentDescriptor,
    ) -> Self {
        self.content_descriptors
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), content_descriptor);
        self
    }

    /// Add an error
    pub fn with_error(mut self, name: impl Into<String>, error: ErrorObject) -> Self {
        self.errors
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), error);
        self
    }

    /// Add an example
    pub fn with_example(mut self, name: impl Into<String>, example: Example) -> Self {
        self.examples
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), example);
        self
    }

    /// Add an example pairing
    pub fn with_example_pairing(
        mut self,
        name: impl Into<String>,
        example_pairing: ExamplePairing,
    ) -> Self {
        self.example_pairings
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), example_pairing);
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, name: impl Into<String>, tag: Tag) -> Self {
        self.tags
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), tag);
        self
    }

    /// Look up a component by category and name
    pub fn get(&self, kind: ComponentKind, name: &str) -> Option<Component<'_>> {
        match kind {
            ComponentKind::Schemas => self.schemas.as_ref()?.get(name).map(Component::Schema),
            ComponentKind::ContentDescriptors => self
                .content_descriptors
                .as_ref()?
                .get(name)
                .map(Component::ContentDescriptor),
            ComponentKind::Errors => self.errors.as_ref()?.get(name).map(Component::Error),
            ComponentKind::Examples => self.examples.as_ref()?.get(name).map(Component::Example),
            ComponentKind::ExamplePairings => self
                .example_pairings
                .as_ref()?
                .get(name)
                .map(Component::ExamplePairing),
            ComponentKind::Links => self.links.as_ref()?.get(name).map(Component::Link),
            ComponentKind::Tags => self.tags.as_ref()?.get(name).map(Component::Tag),
        }
    }

    /// Whether a component with this category and name exists
    pub fn contains(&self, kind: ComponentKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// Get a schema by name
    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.as_ref()?.get(name)
    }

    /// Get a content descriptor by name
    pub fn get_content_descriptor(&self, name: &str) -> Option<&ContentDescriptor> {
        self.content_descriptors.as_ref()?.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_kind_segments() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.as_str().parse::<ComponentKind>(), Ok(kind));
        }
        assert!("methods".parse::<ComponentKind>().is_err());
        assert!("Schemas".parse::<ComponentKind>().is_err());
        assert_eq!(
            "examplePairingObjects"
                .parse::<ComponentKind>()
                .unwrap_err()
                .to_string(),
            "unknown component type 'examplePairingObjects'"
        );
    }

    #[test]
    fn test_get_by_kind() {
        let components = Components::new()
            .with_schema("Player", json!({"type": "object"}))
            .with_error("NotFound", ErrorObject::new(404, "not found"))
            .with_tag("admin", Tag::new("admin"));

        assert_eq!(
            components.get(ComponentKind::Schemas, "Player").map(|c| c.kind()),
            Some(ComponentKind::Schemas)
        );
        assert!(components.contains(ComponentKind::Errors, "NotFound"));
        assert!(components.contains(ComponentKind::Tags, "admin"));
        assert!(!components.contains(ComponentKind::Errors, "Player"));
        assert!(!components.contains(ComponentKind::Links, "anything"));
    }

    #[test]
    fn test_example_pairings_key_alias() {
        let legacy: Components = serde_json::from_value(json!({
            "examplePairingObjects": {"basic": {"name": "basic", "params": []}}
        }))
        .unwrap();
        assert!(legacy.contains(ComponentKind::ExamplePairings, "basic"));

        let current: Components = serde_json::from_value(json!({
            "examplePairings": {"basic": {"name": "basic", "params": []}}
        }))
        .unwrap();
        assert_eq!(legacy, current);

        let json = serde_json::to_value(&current).unwrap();
        assert!(json.get("examplePairings").is_some());
    }
}
