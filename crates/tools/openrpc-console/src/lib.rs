//! Command line console for OpenRPC documents
//!
//! `check` and `describe` work offline on a document file; `call` and `listen`
//! connect to the server over WebSocket using [`ras_openrpc_client`].

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::Args;
pub use error::ConsoleError;
