//! Init command - initialize configuration file.

use sentinelfetch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() {
        println!("Configuration file already exists: {}", path.display());
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Set hub.username and hub.password before your first download:");
    println!("  sentinelfetch config set hub.username <name>");
    println!("  sentinelfetch config set hub.password <password>");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
