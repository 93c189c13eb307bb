//! Quote CLI entry point

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use interface_cli::{init_tracing, App, Cli, CliConfig};

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.merge_into(CliConfig::from_env().context("Failed to load configuration")?);

    init_tracing(&config.log_level, config.log_format);
    tracing::debug!(?config, "Configuration loaded");

    let app = App::new(config).context("Failed to load schemas")?;
    let outcome = app.run(&cli.command)?;

    println!("{}", outcome.output);

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
