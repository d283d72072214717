//! ipy-alerts - run a command, then email a notification about it.

use anyhow::Result;
use clap::Parser;
use ipy_alerts::{app::App, cli::Cli, executor::CommandRunner};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (request, command) = cli.into_request();
    let runner = CommandRunner::new(command);

    let app = App::new();
    app.run(&request, || runner.run())?;
    info!("work finished, notification sent");

    Ok(())
}
