//! ktxarray CLI - Command-line interface
//!
//! Assembles KTX2 texture arrays from single-layer files and exposes the
//! library's buffer sizing and memory policy decisions for inspection.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ktxarray::logging::init_logging;

use commands::assemble::AssembleArgs;
use commands::config::ConfigCommands;
use commands::estimate::EstimateArgs;
use commands::probe::ProbeArgs;
use commands::profile::ProfileArgs;
use error::CliError;

/// KTX2 texture-array assembly and encoder sizing
#[derive(Debug, Parser)]
#[command(name = "ktxarray", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Assemble single-layer KTX2 files into one KTX2 texture array
    Assemble(AssembleArgs),

    /// Estimate the encoder buffer size for a source image
    Estimate(EstimateArgs),

    /// Show the memory profile for a described platform
    Profile(ProfileArgs),

    /// Find the largest allocatable block by trial allocation (slow)
    Probe(ProbeArgs),

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Assemble(args) => commands::assemble::run(args),
        Commands::Estimate(args) => commands::estimate::run(args).await,
        Commands::Profile(args) => commands::profile::run(args),
        Commands::Probe(args) => commands::probe::run(args).await,
        Commands::Config { command } => commands::config::run(command),
    }
}
