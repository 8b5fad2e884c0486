//! Subcommand implementations

use crate::cli::ConnectionArgs;
use crate::error::ConsoleError;
use openrpc_document::{OpenRpcDocument, ValidatedDocument, collect_invalid_refs};
use ras_openrpc_client::{ClientConfig, JsonRpcClient};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

fn read_document(path: &Path) -> Result<OpenRpcDocument, ConsoleError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConsoleError::InputFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(OpenRpcDocument::from_json_str(&content)?)
}

/// Load a document and pass it through the reference gate
pub fn load_validated(path: &Path) -> Result<ValidatedDocument, ConsoleError> {
    let document = ValidatedDocument::new(read_document(path)?)?;
    for name in document.duplicate_method_names() {
        warn!(method = name, "method declared more than once");
    }
    Ok(document)
}

pub fn check<W: Write>(path: &Path, out: &mut W) -> Result<(), ConsoleError> {
    let document = read_document(path)?;
    if !document.is_supported_version() {
        warn!(version = %document.openrpc, "unsupported OpenRPC version");
    }

    let invalid = collect_invalid_refs(&document)?;
    if invalid.is_empty() {
        writeln!(
            out,
            "{}: {} methods, all references resolve",
            path.display(),
            document.methods.len()
        )?;
        return Ok(());
    }

    for reference in &invalid {
        writeln!(out, "invalid reference: {}", reference)?;
    }
    Err(ConsoleError::InvalidReferences {
        count: invalid.len(),
    })
}

pub fn describe<W: Write>(path: &Path, out: &mut W) -> Result<(), ConsoleError> {
    let document = load_validated(path)?;
    let (notifications, requests): (Vec<_>, Vec<_>) = document
        .distinct_methods()
        .into_iter()
        .partition(|method| method.is_notification());

    writeln!(out, "{}", document.info.label())?;

    writeln!(out, "\nrequests:")?;
    for method in requests {
        describe_method(&document, &method.name, out)?;
    }

    writeln!(out, "\nnotifications:")?;
    for method in notifications {
        describe_method(&document, &method.name, out)?;
    }
    Ok(())
}

/// One signature line; methods whose shapes cannot be resolved are reported in place.
fn describe_method<W: Write>(
    document: &ValidatedDocument,
    name: &str,
    out: &mut W,
) -> Result<(), ConsoleError> {
    match document.signature(name) {
        Ok(signature) => writeln!(out, "  {}", signature)?,
        Err(e) => {
            warn!(method = name, error = %e, "cannot describe method");
            writeln!(out, "  {}: {}", name, e)?;
        }
    }
    Ok(())
}

fn client_config(
    document: &ValidatedDocument,
    connection: &ConnectionArgs,
) -> Result<ClientConfig, ConsoleError> {
    let url = match &connection.url {
        Some(url) => url.clone(),
        None => document
            .default_server()
            .map(|server| server.resolved_url())
            .ok_or(ConsoleError::NoServerUrl)?,
    };

    let config = ClientConfig::new(url);
    Ok(match &connection.token {
        Some(token) => config.with_bearer_token(token),
        None => config,
    })
}

/// Interpret a command line argument as JSON, falling back to a plain string
pub fn parse_argument(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub async fn call<W: Write + Send>(
    path: &Path,
    connection: &ConnectionArgs,
    method: &str,
    raw_args: &[String],
    pretty: bool,
    out: &mut W,
) -> Result<(), ConsoleError> {
    let document = load_validated(path)?;
    let config = client_config(&document, connection)?;
    let args: Vec<Value> = raw_args.iter().map(|raw| parse_argument(raw)).collect();

    info!(url = %config.url, method, "calling");
    let client = JsonRpcClient::connect(config, document).await?;
    let outcome = client.call(method, args).await;
    if let Err(e) = client.close().await {
        debug!(error = %e, "error while closing");
    }

    let result = outcome?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    writeln!(out, "{}", rendered)?;
    Ok(())
}

pub async fn listen(
    path: &Path,
    connection: &ConnectionArgs,
    events: &[String],
) -> Result<(), ConsoleError> {
    let document = load_validated(path)?;
    let config = client_config(&document, connection)?;

    let names: Vec<String> = if events.is_empty() {
        document
            .notification_method_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        events.to_vec()
    };

    info!(url = %config.url, "listening");
    let client = JsonRpcClient::connect(config, document).await?;
    for name in &names {
        let label = name.clone();
        client.add_event_listener(name, move |params| println!("{} {}", label, params))?;
    }

    tokio::select! {
        _ = client.wait_closed() => info!("connection closed by server"),
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            client.close().await?;
        }
    }
    Ok(())
}
