use crate::commands;
use crate::error::ConsoleError;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Inspect OpenRPC documents and talk to their servers over WebSocket
#[derive(Parser, Debug, Clone)]
#[command(name = "openrpc-console")]
#[command(about = "Inspect OpenRPC documents and call their methods over WebSocket")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that every $ref in the document resolves
    Check {
        /// Path to the OpenRPC document (JSON)
        #[arg(short, long, value_name = "FILE")]
        document: PathBuf,
    },

    /// Print the signature of every method
    Describe {
        /// Path to the OpenRPC document (JSON)
        #[arg(short, long, value_name = "FILE")]
        document: PathBuf,
    },

    /// Call a request method and print its result
    Call {
        /// Path to the OpenRPC document (JSON)
        #[arg(short, long, value_name = "FILE")]
        document: PathBuf,

        #[command(flatten)]
        connection: ConnectionArgs,

        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,

        /// Method name
        method: String,

        /// Positional arguments, each a JSON value. Text that is not valid JSON is sent as a string.
        args: Vec<String>,
    },

    /// Print notifications as they arrive
    Listen {
        /// Path to the OpenRPC document (JSON)
        #[arg(short, long, value_name = "FILE")]
        document: PathBuf,

        #[command(flatten)]
        connection: ConnectionArgs,

        /// Notification names to subscribe to (all when omitted)
        events: Vec<String>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// WebSocket URL (defaults to the document's first server)
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Bearer token sent during the handshake
    #[arg(short, long, env = "OPENRPC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl Args {
    pub async fn run<W: Write + Send>(&self, out: &mut W) -> Result<(), ConsoleError> {
        match &self.command {
            Command::Check { document } => commands::check(document, out),
            Command::Describe { document } => commands::describe(document, out),
            Command::Call {
                document,
                connection,
                pretty,
                method,
                args,
            } => commands::call(document, connection, method, args, *pretty, out).await,
            Command::Listen {
                document,
                connection,
                events,
            } => commands::listen(document, connection, events).await,
        }
    }
}
