use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(
    name = "cascade",
    about = "Resolve scripted, cascading build parameters from a job file",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report every configuration problem in a job file
    Check {
        /// Path to the job file
        job: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the order parameters are evaluated in
    Order {
        /// Path to the job file
        job: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one resolution pass and print the snapshot as JSON
    Resolve {
        /// Path to the job file
        job: PathBuf,

        /// Engine configuration (TOML)
        #[arg(long, env = "CASCADE_CONFIG")]
        config: Option<PathBuf>,

        /// Submitted value, `name=value`; the value is read as JSON when it
        /// parses, as a string otherwise
        #[arg(long = "value", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, Value)>,

        /// Only run scripts marked sandboxed
        #[arg(long)]
        strict: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in `{raw}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((name.to_owned(), value))
}
