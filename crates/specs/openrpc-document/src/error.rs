//! Error types for OpenRPC document resolution and validation.

use thiserror::Error;

/// Errors that can occur when resolving or validating an OpenRPC document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpenRpcError {
    /// The document contains references that do not resolve to a component
    #[error("Schema contains invalid $ref(s): {}", references.join(", "))]
    InvalidReferences {
        /// Every offending reference path, sorted and de-duplicated
        references: Vec<String>,
    },

    /// Error when resolving a single reference ($ref)
    #[error("Reference resolution error: {message}")]
    ReferenceError {
        /// Reference resolution error message
        message: String,
        /// The reference string that failed to resolve
        reference: String,
    },

    /// A chain of references leads back to a reference already being resolved
    #[error("Reference cycle detected: {}", chain.join(" -> "))]
    ReferenceCycle {
        /// The references in resolution order, ending with the repeated one
        chain: Vec<String>,
    },

    /// No method with the given name is declared in the document
    #[error("Method not found: {name}")]
    MethodNotFound {
        /// The requested method name
        name: String,
    },

    /// Error when parsing or serializing JSON
    #[error("JSON error: {message}")]
    JsonError {
        /// JSON parsing/serialization error message
        message: String,
    },
}

impl OpenRpcError {
    /// Create an invalid references error
    pub fn invalid_references(references: Vec<String>) -> Self {
        Self::InvalidReferences { references }
    }

    /// Create a new reference resolution error
    pub fn reference(message: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::ReferenceError {
            message: message.into(),
            reference: reference.into(),
        }
    }

    /// Create a reference cycle error
    pub fn reference_cycle(chain: Vec<String>) -> Self {
        Self::ReferenceCycle { chain }
    }

    /// Create a method not found error
    pub fn method_not_found(name: impl Into<String>) -> Self {
        Self::MethodNotFound { name: name.into() }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::JsonError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for OpenRpcError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

/// Result type for OpenRPC operations
pub type OpenRpcResult<T> = Result<T, OpenRpcError>;
