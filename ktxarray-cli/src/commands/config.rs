//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! for viewing and modifying `config.ini` from the command line.

use std::path::Path;

use clap::Subcommand;
use console::style;
use ktxarray::config::{config_file_path, ConfigFile, ConfigKey};

use super::common::load_config_at;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., capacity.max_size)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., capacity.max_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against the default config file.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    let path = config_file_path();
    match command {
        ConfigCommands::Get { key } => println!("{}", get_value(&path, &key)?),
        ConfigCommands::Set { key, value } => {
            let (key, value) = set_value(&path, &key, &value)?;
            println!("{} {} = {}", style("Set").green().bold(), key.name(), value);
        }
        ConfigCommands::List => print_list(&load_config_at(&path)),
        ConfigCommands::Path => println!("{}", path.display()),
    }
    Ok(())
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'ktxarray config list' to see available keys.",
            key
        ))
    })
}

/// Current value of `key` in the file at `path`, defaults if it is missing.
fn get_value(path: &Path, key: &str) -> Result<String, CliError> {
    let key = parse_key(key)?;
    Ok(key.get(&load_config_at(path)))
}

/// Update `key` in the file at `path`, returning the value as stored.
///
/// A file that exists but cannot be parsed is reported rather than
/// replaced with defaults. Nothing is written if the new value is invalid.
fn set_value(path: &Path, key: &str, value: &str) -> Result<(ConfigKey, String), CliError> {
    let key = parse_key(key)?;

    let mut config = ConfigFile::load_or_default(path)?;
    key.set(&mut config, value)?;
    config.validate()?;
    config.save_to(path)?;

    tracing::info!(path = %path.display(), key = %key, "Updated config");
    Ok((key, key.get(&config)))
}

fn print_list(config: &ConfigFile) {
    println!("{}", style("Configuration").bold());

    let mut current_section = "";
    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            println!();
            println!("[{}]", section);
            current_section = section;
        }
        println!("{} = {}", key.key_name(), key.get(config));
    }
}
