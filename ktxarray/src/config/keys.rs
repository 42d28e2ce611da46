//! Typed access to individual settings by `section.key` name.

use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;
use super::file::ConfigFile;
use super::size::parse_size;
use crate::capacity::SizingModel;
use crate::encoder::FormatMode;

/// Every setting in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    CapacityModel,
    CapacityMipmaps,
    CapacitySafetyMultiplier,
    CapacityHeaderAllowance,
    CapacityFallbackDimension,
    CapacityMinSize,
    CapacityMaxSize,

    EncodingMultithreading,
    EncodingUastcQuality,
    EncodingRdoEnabled,
    EncodingRdoQuality,
    EncodingSrgb,
    EncodingMipmaps,
    EncodingFormatMode,
    EncodingSupercompression,

    MemoryThreadingThreshold,
    MemoryPrivateFloor,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::CapacityModel,
    ConfigKey::CapacityMipmaps,
    ConfigKey::CapacitySafetyMultiplier,
    ConfigKey::CapacityHeaderAllowance,
    ConfigKey::CapacityFallbackDimension,
    ConfigKey::CapacityMinSize,
    ConfigKey::CapacityMaxSize,
    ConfigKey::EncodingMultithreading,
    ConfigKey::EncodingUastcQuality,
    ConfigKey::EncodingRdoEnabled,
    ConfigKey::EncodingRdoQuality,
    ConfigKey::EncodingSrgb,
    ConfigKey::EncodingMipmaps,
    ConfigKey::EncodingFormatMode,
    ConfigKey::EncodingSupercompression,
    ConfigKey::MemoryThreadingThreshold,
    ConfigKey::MemoryPrivateFloor,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// INI section of the key.
    pub fn section(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            CapacityModel
            | CapacityMipmaps
            | CapacitySafetyMultiplier
            | CapacityHeaderAllowance
            | CapacityFallbackDimension
            | CapacityMinSize
            | CapacityMaxSize => "capacity",
            EncodingMultithreading
            | EncodingUastcQuality
            | EncodingRdoEnabled
            | EncodingRdoQuality
            | EncodingSrgb
            | EncodingMipmaps
            | EncodingFormatMode
            | EncodingSupercompression => "encoding",
            MemoryThreadingThreshold | MemoryPrivateFloor => "memory",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            CapacityModel => "model",
            CapacityMipmaps => "mipmaps",
            CapacitySafetyMultiplier => "safety_multiplier",
            CapacityHeaderAllowance => "header_allowance",
            CapacityFallbackDimension => "fallback_dimension",
            CapacityMinSize => "min_size",
            CapacityMaxSize => "max_size",
            EncodingMultithreading => "multithreading",
            EncodingUastcQuality => "uastc_quality",
            EncodingRdoEnabled => "rdo_enabled",
            EncodingRdoQuality => "rdo_quality",
            EncodingSrgb => "srgb",
            EncodingMipmaps => "mipmaps",
            EncodingFormatMode => "format_mode",
            EncodingSupercompression => "supercompression",
            MemoryThreadingThreshold => "threading_threshold",
            MemoryPrivateFloor => "private_floor",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Look up a key by section and key name.
    pub fn find(section: &str, key: &str) -> Option<ConfigKey> {
        ALL_KEYS
            .iter()
            .copied()
            .find(|k| k.section() == section && k.key_name() == key)
    }

    /// Current value as written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        use ConfigKey::*;
        let capacity = &config.capacity;
        let encoding = &config.encoding;
        let memory = &config.memory;
        match self {
            CapacityModel => capacity.model.to_string(),
            CapacityMipmaps => capacity.mipmaps.to_string(),
            CapacitySafetyMultiplier => capacity.safety_multiplier.to_string(),
            CapacityHeaderAllowance => capacity.header_allowance.to_string(),
            CapacityFallbackDimension => capacity.fallback_dimension.to_string(),
            CapacityMinSize => capacity.min_size.to_string(),
            CapacityMaxSize => capacity.max_size.to_string(),
            EncodingMultithreading => encoding.multithreading.to_string(),
            EncodingUastcQuality => encoding.uastc_quality.to_string(),
            EncodingRdoEnabled => encoding.rdo_enabled.to_string(),
            EncodingRdoQuality => encoding.rdo_quality.to_string(),
            EncodingSrgb => encoding.srgb.to_string(),
            EncodingMipmaps => encoding.mipmaps.to_string(),
            EncodingFormatMode => encoding.format_mode.to_string(),
            EncodingSupercompression => encoding.supercompression.to_string(),
            MemoryThreadingThreshold => memory.threading_threshold.to_string(),
            MemoryPrivateFloor => memory.private_floor.to_string(),
        }
    }

    /// Parse `value` and store it.
    ///
    /// Cross-field consistency (for example `min_size <= max_size`) is
    /// checked by [`ConfigFile::validate`], not here.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        use ConfigKey::*;
        let capacity = &mut config.capacity;
        let encoding = &mut config.encoding;
        let memory = &mut config.memory;
        match self {
            CapacityModel => {
                capacity.model = value
                    .parse::<SizingModel>()
                    .map_err(|e| self.invalid(value, e.to_string()))?
            }
            CapacityMipmaps => capacity.mipmaps = self.parse_bool(value)?,
            CapacitySafetyMultiplier => capacity.safety_multiplier = self.parse(value)?,
            CapacityHeaderAllowance => capacity.header_allowance = self.parse_size(value)?,
            CapacityFallbackDimension => capacity.fallback_dimension = self.parse(value)?,
            CapacityMinSize => capacity.min_size = self.parse_size(value)?,
            CapacityMaxSize => capacity.max_size = self.parse_size(value)?,
            EncodingMultithreading => encoding.multithreading = self.parse_bool(value)?,
            EncodingUastcQuality => {
                let level: u32 = self.parse(value)?;
                if level > 4 {
                    return Err(self.invalid(value, "expected 0-4"));
                }
                encoding.uastc_quality = level;
            }
            EncodingRdoEnabled => encoding.rdo_enabled = self.parse_bool(value)?,
            EncodingRdoQuality => encoding.rdo_quality = self.parse(value)?,
            EncodingSrgb => encoding.srgb = self.parse_bool(value)?,
            EncodingMipmaps => encoding.mipmaps = self.parse_bool(value)?,
            EncodingFormatMode => {
                encoding.format_mode = value
                    .parse::<FormatMode>()
                    .map_err(|e| self.invalid(value, e))?
            }
            EncodingSupercompression => encoding.supercompression = self.parse_bool(value)?,
            MemoryThreadingThreshold => memory.threading_threshold = self.parse_size(value)? as u64,
            MemoryPrivateFloor => memory.private_floor = self.parse_size(value)? as u64,
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigError>
    where
        T::Err: fmt::Display,
    {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| self.invalid(value, e.to_string()))
    }

    fn parse_bool(&self, value: &str) -> Result<bool, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn parse_size(&self, value: &str) -> Result<usize, ConfigError> {
        parse_size(value).ok_or_else(|| self.invalid(value, "expected a size such as 4096 or 32MB"))
    }

    fn invalid(&self, value: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.section().to_string(),
            key: self.key_name().to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (section, key) = s
            .split_once('.')
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))?;
        ConfigKey::find(section.trim(), key.trim()).ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
