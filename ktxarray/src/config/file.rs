//! `config.ini` loading and saving.

use std::path::{Path, PathBuf};

use ini::Ini;

use super::error::ConfigError;
use super::keys::ConfigKey;
use crate::capacity::CapacityConfig;
use crate::encoder::EncodeSettings;
use crate::memory::MemoryPolicyConfig;

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "ktxarray";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Path of the user's config file.
///
/// `$XDG_CONFIG_HOME/ktxarray/config.ini` on Linux, the platform
/// equivalent elsewhere, or `./ktxarray/config.ini` if no config directory
/// can be determined.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Persistent defaults for the CLI and library callers.
///
/// ```ini
/// [capacity]
/// model = pixel
/// max_size = 32MB
///
/// [encoding]
/// mipmaps = false
///
/// [memory]
/// threading_threshold = 512MB
/// ```
///
/// Missing keys keep their defaults; unknown sections and keys are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    /// Buffer sizing parameters.
    pub capacity: CapacityConfig,
    /// Encoder settings.
    pub encoding: EncodeSettings,
    /// Memory policy thresholds.
    pub memory: MemoryPolicyConfig,
}

impl ConfigFile {
    /// Load from the default location.
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(&config_file_path())
    }

    /// Load from a specific file, yielding the defaults if it is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let config = Self::from_ini(&ini)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (section, properties) in ini.iter() {
            let Some(section) = section else { continue };
            for (key, value) in properties.iter() {
                match ConfigKey::find(section, key) {
                    Some(config_key) => config_key.set(&mut config, value)?,
                    None => tracing::debug!(section, key, "Ignoring unknown config key"),
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capacity.validate()?;
        Ok(())
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to a specific file, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        self.to_ini().write_to_file(path).map_err(io_error)?;

        tracing::info!(path = %path.display(), "Saved config file");
        Ok(())
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::SizingModel;
    use tempfile::TempDir;

    #[test]
    fn test_parse_overrides_defaults() {
        let config = ConfigFile::parse(
            "[capacity]\nmodel = block\nmax_size = 64MB\n\n[encoding]\nmipmaps = true\n",
        )
        .unwrap();

        assert_eq!(config.capacity.model, SizingModel::BlockAccurate);
        assert_eq!(config.capacity.max_size, 64 * 1024 * 1024);
        assert!(config.encoding.mipmaps);
        assert_eq!(config.memory, MemoryPolicyConfig::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config =
            ConfigFile::parse("[capacity]\nturbo = yes\n\n[cache]\ndirectory = /tmp\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_invalid_value_reported() {
        let err = ConfigFile::parse("[memory]\nprivate_floor = lots\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("memory.private_floor"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = ConfigFile::parse("[capacity]\nmin_size = 64MB\nmax_size = 1MB\n").unwrap_err();
        assert!(matches!(err, ConfigError::Capacity(_)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.capacity.model = SizingModel::BlockAccurate;
        config.encoding.rdo_enabled = true;
        config.memory.threading_threshold = 1 << 30;

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = ConfigFile::load_from(&temp.path().join("absent.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_or_default(&temp.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("ktxarray/config.ini"));
    }
}
