//! sentinelfetch CLI - Command-line interface
//!
//! Thin front end over the `sentinelfetch` library: parses arguments, merges
//! them with the configuration file and drives an archive run.

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod progress;

use commands::config::ConfigCommands;
use commands::download::DownloadArgs;
use error::CliError;

/// Download Sentinel products from a data HUB into a local archive.
#[derive(Debug, Parser)]
#[command(name = "sentinelfetch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the HUB and download every matching product
    Download(DownloadArgs),

    /// View or edit configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Write a default configuration file
    Init,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Download(args) => commands::download::run(args),
        Commands::Config { command } => commands::config::run(command),
        Commands::Init => commands::init::run(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", console::style("Error:").red().bold(), e);
        std::process::exit(e.exit_code());
    }
}
