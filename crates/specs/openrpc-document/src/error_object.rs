//! Application errors a method declares it may return.

use crate::Extensions;
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An error a method may fail with, as declared in the document.
///
/// Same fields as a JSON-RPC error object on the wire. Codes in the reserved
/// range `-32768..=-32000` belong to the protocol and should not be declared here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ErrorObject {
    pub code: i64,

    #[builder(into)]
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self::builder().code(code).message(message).build()
    }

    /// Whether the code falls in the range reserved by JSON-RPC 2.0
    pub fn is_reserved_code(&self) -> bool {
        (-32768..=-32000).contains(&self.code)
    }
}
