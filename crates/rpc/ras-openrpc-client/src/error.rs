//! Error types for the OpenRPC client

use openrpc_document::OpenRpcError;
use ras_jsonrpc_types::JsonRpcError;
use thiserror::Error;

/// Errors that can occur in the OpenRPC client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Error object returned by the server, or a synthetic `-32603` for a
    /// closed connection or a failed send
    #[error("JSON-RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Client is not connected
    #[error("Client is not connected")]
    NotConnected,

    /// The document declares no method with this name
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// The method has no result and can only arrive as a notification
    #[error("Method '{0}' declares no result and cannot be called")]
    NotARequest(String),

    /// Listeners can only be attached to notification methods
    #[error("'{0}' is not a notification method")]
    UnknownNotification(String),

    /// Arguments do not fit the method's declared parameters
    #[error("Invalid arguments for '{method}': {message}")]
    InvalidArguments { method: String, message: String },

    /// WebSocket connection error
    #[error("WebSocket connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document resolution error
    #[error("Document error: {0}")]
    Document(#[from] OpenRpcError),

    /// Tungstenite WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A handshake header could not be encoded
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ClientError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments<M: Into<String>, S: Into<String>>(method: M, msg: S) -> Self {
        Self::InvalidArguments {
            method: method.into(),
            message: msg.into(),
        }
    }

    /// The JSON-RPC error code, for errors that carry one
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc(error) => Some(error.code),
            _ => None,
        }
    }

    /// The JSON-RPC error object, for errors that carry one
    pub fn rpc_error(&self) -> Option<&JsonRpcError> {
        match self {
            Self::Rpc(error) => Some(error),
            _ => None,
        }
    }
}

impl From<JsonRpcError> for ClientError {
    fn from(error: JsonRpcError) -> Self {
        Self::Rpc(error)
    }
}

/// Result type for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ras_jsonrpc_types::error_codes;

    #[test]
    fn test_error_creation() {
        let err = ClientError::connection("test connection error");
        assert!(matches!(err, ClientError::Connection(_)));
        assert_eq!(
            err.to_string(),
            "WebSocket connection error: test connection error"
        );
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_rpc_error_code() {
        let err: ClientError = JsonRpcError::connection_closed().into();
        assert_eq!(err.code(), Some(error_codes::INTERNAL_ERROR));
        assert_eq!(err.to_string(), "JSON-RPC error -32603: Connection closed");
        assert_eq!(err.rpc_error().map(|e| e.message.as_str()), Some("Connection closed"));
    }

    #[test]
    fn test_invalid_arguments_display() {
        let err = ClientError::invalid_arguments("search", "expected at most 2 arguments, got 3");
        assert_eq!(
            err.to_string(),
            "Invalid arguments for 'search': expected at most 2 arguments, got 3"
        );
    }
}
