//! Cascade CLI: the `cascade` command.

mod cli;
mod commands;
mod job;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = cascade_log::auto_init()?;

    match cli.command {
        Commands::Check { job, json } => commands::check::run(&job, json),
        Commands::Order { job, json } => commands::order::run(&job, json),
        Commands::Resolve {
            job,
            config,
            values,
            strict,
        } => commands::resolve::run(&job, config.as_deref(), values, strict).await,
    }
}
