//! Reference Object and same-document `$ref` resolution.
//!
//! Only internal references of the form `#/components/<componentType>/<componentName>`
//! are understood. Anything else (external URLs, JSON pointers into other parts of the
//! document) is unresolved.

use crate::{
    Component, ComponentKind, OpenRpcDocument,
    error::{OpenRpcError, OpenRpcResult},
};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

const COMPONENTS_PREFIX: &str = "#/components/";

/// A simple object to allow referencing other components in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    /// The reference string.
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    /// Create a new reference with a custom reference string
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// Create a new reference to a component
    pub fn component(kind: ComponentKind, name: &str) -> Self {
        Self {
            reference: ReferencePath::new(kind, name).to_string(),
        }
    }

    /// Create a new reference to a schema component
    pub fn schema(name: &str) -> Self {
        Self::component(ComponentKind::Schemas, name)
    }

    /// Create a new reference to a content descriptor component
    pub fn content_descriptor(name: &str) -> Self {
        Self::component(ComponentKind::ContentDescriptors, name)
    }

    /// Parse the reference string into its component path
    pub fn path(&self) -> Option<ReferencePath> {
        ReferencePath::parse(&self.reference)
    }
}

/// A parsed `#/components/<componentType>/<componentName>` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferencePath {
    /// The component category segment
    pub kind: ComponentKind,
    /// Everything after the category segment
    pub name: String,
}

impl ReferencePath {
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Parse a reference string. Returns `None` for anything outside the grammar,
    /// including unknown component categories and empty names.
    pub fn parse(reference: &str) -> Option<Self> {
        let path = reference.strip_prefix(COMPONENTS_PREFIX)?;
        let (kind, name) = path.split_once('/')?;
        if name.is_empty() {
            return None;
        }
        Some(Self {
            kind: kind.parse().ok()?,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ReferencePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", COMPONENTS_PREFIX, self.kind, self.name)
    }
}

/// Resolve a reference string against the document's components.
///
/// The resolved component is returned as-is; its shape is not checked here.
pub fn resolve_ref<'a>(
    document: &'a OpenRpcDocument,
    reference: &str,
) -> OpenRpcResult<Component<'a>> {
    let path = ReferencePath::parse(reference).ok_or_else(|| {
        OpenRpcError::reference(
            "reference must have the form #/components/<componentType>/<componentName>",
            reference,
        )
    })?;

    let components = document.components.as_ref().ok_or_else(|| {
        OpenRpcError::reference("document declares no components", reference)
    })?;

    components.get(path.kind, &path.name).ok_or_else(|| {
        OpenRpcError::reference(
            format!("no component named '{}' under {}", path.name, path.kind),
            reference,
        )
    })
}

/// Whether a reference string resolves within the document.
pub fn is_valid_ref(document: &OpenRpcDocument, reference: &str) -> bool {
    resolve_ref(document, reference).is_ok()
}
