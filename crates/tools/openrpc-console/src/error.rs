use openrpc_document::OpenRpcError;
use ras_openrpc_client::ClientError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the console
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Failed to read OpenRPC file at {path}: {source}")]
    InputFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load OpenRPC document: {0}")]
    Document(#[from] OpenRpcError),

    #[error("Document contains {count} invalid reference(s)")]
    InvalidReferences { count: usize },

    #[error("No --url given and the document declares no servers")]
    NoServerUrl,

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode result: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}
