//! WebSocket JSON-RPC 2.0 client driven by an OpenRPC document
//!
//! The client only accepts an [`openrpc_document::ValidatedDocument`], so every
//! `$ref` in the document is known to resolve before a connection is opened. From
//! the document it knows which methods may be called (those with a `result`), how
//! many positional arguments each takes, and which notifications the server may
//! send.
//!
//! - Requests are correlated with responses by a strictly increasing numeric id
//! - Server notifications are dispatched to listeners registered per method name
//! - Closing the connection fails every pending call with `-32603 Connection closed`
//!
//! # Examples
//!
//! ```rust,no_run
//! use openrpc_document::ValidatedDocument;
//! use ras_openrpc_client::{ClientConfig, JsonRpcClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = ValidatedDocument::from_json_str(&std::fs::read_to_string("api.json")?)?;
//!     let config = ClientConfig::new("ws://localhost:25585").with_bearer_token("secret");
//!
//!     let client = JsonRpcClient::connect(config, document).await?;
//!     client.add_event_listener("notification/server/saved", |params| {
//!         println!("saved: {params}");
//!     })?;
//!
//!     let status: serde_json::Value = client.call_as("server/status", vec![]).await?;
//!     println!("{status}");
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use ras_jsonrpc_types::JsonRpcError;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;

pub mod client;
pub mod config;
pub mod error;
pub mod native;

pub use client::JsonRpcClient;
pub use config::{AuthConfig, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use native::WebSocketTransport;

/// Handler invoked with the `params` of each matching notification (`null` when absent)
pub type NotificationHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Identifies one registered listener so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Connection lifecycle. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Connecting,
    Open,
    Closed,
}

/// Raw lifecycle events produced by a transport. Only the client's dispatcher consumes these.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Open,
    Message(String),
    Error(String),
    Close { reason: Option<String> },
}

/// A message-oriented, full-duplex connection carrying JSON text frames.
///
/// Implementations deliver inbound traffic as [`TransportEvent`]s over the
/// channel handed to [`JsonRpcClient::with_transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one text frame
    async fn send(&self, text: String) -> ClientResult<()>;

    /// Close the connection
    async fn close(&self) -> ClientResult<()>;

    /// Check if the connection is currently usable
    fn is_open(&self) -> bool;
}

/// Pending request waiting for a response
#[derive(Debug)]
pub struct PendingRequest {
    pub method: String,
    pub sender: oneshot::Sender<Result<Value, JsonRpcError>>,
}
