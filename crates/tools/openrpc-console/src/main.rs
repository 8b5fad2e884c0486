use anyhow::Context;
use clap::Parser;
use openrpc_console::Args;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout();
    if let Err(e) = args.run(&mut stdout).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    std::io::Write::flush(&mut stdout).context("failed to flush stdout")?;
    Ok(())
}
