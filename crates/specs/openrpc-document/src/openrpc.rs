//! OpenRPC Object: the root of a document.

use crate::{
    Components, Extensions, ExternalDocumentation, Info, Method, Reference, Server,
    error::OpenRpcResult,
};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// This is the root object of the OpenRPC document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct OpenRpcDocument {
    /// The semantic version of the OpenRPC specification the document uses.
    pub openrpc: String,

    /// Provides metadata about the API.
    pub info: Info,

    /// Connectivity information for target servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    /// The available methods for the API, in declaration order.
    pub methods: Vec<MethodOrReference>,

    /// Reusable components referenced from elsewhere in the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    /// Additional external documentation.
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    /// JSON Schema URI the document claims to conform to.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

/// Method Object or Reference Object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodOrReference {
    Reference(Reference),
    Method(Box<Method>),
}

impl From<Method> for MethodOrReference {
    fn from(method: Method) -> Self {
        MethodOrReference::Method(Box::new(method))
    }
}

impl OpenRpcDocument {
    /// Create a new document with the current specification version
    pub fn new(info: Info, methods: Vec<MethodOrReference>) -> Self {
        Self {
            openrpc: crate::version::CURRENT.to_string(),
            info,
            servers: None,
            methods,
            components: None,
            external_docs: None,
            schema_uri: None,
            extensions: Extensions::new(),
        }
    }

    /// Parse a document from JSON text. No reference checking happens here.
    pub fn from_json_str(json: &str) -> OpenRpcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a method
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method.into());
        self
    }

    /// Add a server
    pub fn with_server(mut self, server: Server) -> Self {
        self.servers.get_or_insert_with(Vec::new).push(server);
        self
    }

    /// Set the components
    pub fn with_components(mut self, components: Components) -> Self {
        self.components = Some(components);
        self
    }

    /// Iterate over inline methods in declaration order, skipping `$ref` entries
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter_map(|method| match method {
            MethodOrReference::Method(m) => Some(m.as_ref()),
            MethodOrReference::Reference(_) => None,
        })
    }

    /// The first declared server, if any
    pub fn default_server(&self) -> Option<&Server> {
        self.servers.as_deref()?.first()
    }

    /// Check if this document uses a supported OpenRPC version
    pub fn is_supported_version(&self) -> bool {
        crate::version::is_supported(&self.openrpc)
    }
}
