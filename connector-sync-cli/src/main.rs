#![allow(clippy::print_stdout, reason = "CLI prints results to stdout")]

use clap::Parser;
use tokio_util::sync::CancellationToken;

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    connector_sync_core::logging::init(cli.verbose)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling in-flight requests");
            on_signal.cancel();
        }
    });

    let config = cli.provider.to_config();
    commands::run(&config, cli.command, &cancel).await
}
