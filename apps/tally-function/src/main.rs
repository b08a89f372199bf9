//! # tally-function CLI Entry Point
//!
//! Assembles subcommands and dispatches to [`tally_function::commands`].
//! Results go to stdout, logs to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tally_function::commands::{self, DiscountKind};
use tally_function::FunctionConfig;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Tally discount functions: evaluate carts, validate configurations.
#[derive(Parser, Debug)]
#[command(name = "tally-function", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Evaluate a function input and print the function result.
    Run {
        /// Which discount function to run.
        #[arg(value_enum)]
        kind: DiscountKind,
        /// Read the function input from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a raw discount configuration.
    Validate {
        /// Which configuration family to validate.
        #[arg(value_enum)]
        kind: DiscountKind,
        /// Read the configuration from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Field path segment prepended to every error.
        #[arg(long)]
        prefix: Option<String>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Normalize threshold text and print it in form layout.
    Thresholds {
        /// Read the thresholds from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let config = FunctionConfig::load()?;
    init_tracing(&config)?;

    let cli = Cli::parse();
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Run { kind, input, pretty } => {
            let text = commands::read_input(input.as_deref())?;
            let result = commands::run(kind, &text)?;
            println!("{}", commands::to_json(&result, pretty || config.pretty_output)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate {
            kind,
            input,
            prefix,
            pretty,
        } => {
            let text = commands::read_input(input.as_deref())?;
            let pretty = pretty || config.pretty_output;
            match commands::validate(kind, &text, prefix.as_deref())? {
                Ok(canonical) => {
                    println!("{}", commands::to_json(&canonical, pretty)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(errors) => {
                    println!("{}", commands::to_json(&errors, pretty)?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Thresholds { input } => {
            let text = commands::read_input(input.as_deref())?;
            match commands::thresholds(&text) {
                Ok(formatted) => {
                    println!("{formatted}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(reason) => {
                    error!(%reason, "invalid thresholds");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Logs go to stderr so stdout carries only the JSON result.
fn init_tracing(config: &FunctionConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_writer(std::io::stderr)
        .with_ansi(config.log_ansi)
        .with_target(true)
        .init();
    Ok(())
}
