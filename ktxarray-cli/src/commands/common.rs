//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use ktxarray::capacity::SizingModel;
use ktxarray::config::{config_file_path, ConfigFile};
use serde::Serialize;

use crate::error::CliError;

/// Sizing model selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ModelArg {
    /// ~1 byte per pixel with mip and safety multipliers
    Pixel,
    /// Exact 16 bytes per 4×4 block over the mip chain
    Block,
}

impl From<ModelArg> for SizingModel {
    fn from(model: ModelArg) -> Self {
        match model {
            ModelArg::Pixel => SizingModel::PixelApprox,
            ModelArg::Block => SizingModel::BlockAccurate,
        }
    }
}

/// Load config or fall back to defaults, reporting why.
pub fn load_config() -> ConfigFile {
    load_config_at(&config_file_path())
}

/// [`load_config`] for a specific file.
pub fn load_config_at(path: &Path) -> ConfigFile {
    match ConfigFile::load_or_default(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable config file");
            ConfigFile::default()
        }
    }
}

/// Read a whole input file.
pub fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a whole output file.
pub fn write_file(path: &Path, data: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, data).map_err(|source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a `label: value` line with an aligned label.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<22} {}", format!("{}:", label), value);
}
