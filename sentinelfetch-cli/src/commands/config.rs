//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use sentinelfetch::config::{config_file_path, ConfigFile, ConfigKey};

use super::common::unknown_key;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., hub.username)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., hub.username)
        key: String,

        /// Value to set; an empty value clears optional settings
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

/// Get a configuration value.
fn run_get(key: &str) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse().map_err(|_| unknown_key(key))?;

    let config = ConfigFile::load()?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse().map_err(|_| unknown_key(key))?;

    let mut config = ConfigFile::load()?;
    config_key.set(&mut config, value)?;
    config.save()?;

    if config_key.is_secret() {
        println!("Set {}", config_key.name());
    } else {
        println!("Set {} = {}", config_key.name(), value);
    }

    Ok(())
}

/// List all configuration settings.
fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    for line in listing(&config) {
        println!("{}", line);
    }

    Ok(())
}

/// Lines of `config list`, grouped by section. Secrets are masked.
fn listing(config: &ConfigFile) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("[{}]", section));
            current_section = section;
        }

        let value = key.get(config);
        let shown = if value.is_empty() {
            "(not set)".to_string()
        } else if key.is_secret() {
            "********".to_string()
        } else {
            value
        };
        lines.push(format!("  {} = {}", key.key_name(), shown));
    }

    lines
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}
