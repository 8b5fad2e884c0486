//! JSON-RPC 2.0 protocol types and utilities.
//!
//! This crate provides the wire envelopes a client sends and receives, the
//! reserved error codes, and [`IncomingMessage`], which sorts inbound text into
//! responses and notifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The protocol version carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// The JSON-RPC version (always "2.0").
    pub jsonrpc: String,

    /// The method name to call.
    pub method: String,

    /// Parameters for the method call. Omitted entirely when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Request identifier for matching responses. Absent for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// The JSON-RPC version (always "2.0").
    pub jsonrpc: String,

    /// The result of the method call (present on success).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error information (present on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Request identifier for matching with requests.
    pub id: Value,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message} (code {code})")]
pub struct JsonRpcError {
    /// Error code indicating the type of error.
    pub code: i64,

    /// Human-readable error message.
    pub message: String,

    /// Additional error information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC error codes.
pub mod error_codes {
    /// Invalid JSON was received by the server.
    pub const PARSE_ERROR: i64 = -32700;

    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i64 = -32600;

    /// The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i64 = -32601;

    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i64 = -32602;

    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Whether the code belongs to the range reserved by the protocol.
    pub fn is_reserved(code: i64) -> bool {
        (-32768..=-32000).contains(&code)
    }
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request.
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Creates a request that expects a response correlated by `id`.
    pub fn call(method: impl Into<String>, params: Option<Value>, id: u64) -> Self {
        Self::new(method, params, Some(Value::from(id)))
    }

    /// Creates a notification: a request without an id.
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(method, params, None)
    }
}

impl JsonRpcResponse {
    /// Creates a successful JSON-RPC response.
    pub fn success(result: Value, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Creates an error JSON-RPC response.
    pub fn error(error: JsonRpcError, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

impl JsonRpcError {
    /// Creates a new JSON-RPC error.
    pub fn new(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Creates a parse error.
    pub fn parse_error() -> Self {
        Self::new(error_codes::PARSE_ERROR, "Parse error", None)
    }

    /// Creates an invalid request error.
    pub fn invalid_request() -> Self {
        Self::new(error_codes::INVALID_REQUEST, "Invalid Request", None)
    }

    /// Creates a method not found error.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
            None,
        )
    }

    /// Creates an invalid params error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_PARAMS, message, None)
    }

    /// Creates an internal error.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message, None)
    }

    /// The error every pending call fails with when the connection goes away.
    pub fn connection_closed() -> Self {
        Self::internal_error("Connection closed")
    }
}

/// Why an inbound text frame could not be classified.
#[derive(Debug, Error)]
pub enum MalformedMessage {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not a JSON object")]
    NotAnObject,

    #[error("response carries neither result nor error")]
    EmptyResponse,

    #[error("invalid error object: {0}")]
    InvalidError(serde_json::Error),

    #[error("message has neither id nor method")]
    Unclassified,
}

/// A message received from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// Anything carrying an `id`: the answer to one of our requests.
    Response {
        id: Value,
        outcome: Result<Value, JsonRpcError>,
    },
    /// A `method` without an `id`.
    Notification { method: String, params: Value },
}

impl IncomingMessage {
    /// Classify one inbound text frame.
    ///
    /// A message with an `id` is a response, a message with a `method` and no
    /// `id` is a notification. `params` defaults to `null` when absent.
    pub fn parse(text: &str) -> Result<Self, MalformedMessage> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(mut object) = value else {
            return Err(MalformedMessage::NotAnObject);
        };

        if let Some(id) = object.remove("id") {
            let outcome = match (object.remove("error"), object.remove("result")) {
                (Some(error), _) if !error.is_null() => Err(
                    serde_json::from_value::<JsonRpcError>(error)
                        .map_err(MalformedMessage::InvalidError)?,
                ),
                (_, Some(result)) => Ok(result),
                _ => return Err(MalformedMessage::EmptyResponse),
            };
            return Ok(IncomingMessage::Response { id, outcome });
        }

        match object.remove("method") {
            Some(Value::String(method)) => Ok(IncomingMessage::Notification {
                method,
                params: object.remove("params").unwrap_or(Value::Null),
            }),
            _ => Err(MalformedMessage::Unclassified),
        }
    }
}
