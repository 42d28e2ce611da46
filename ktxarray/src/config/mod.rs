//! Configuration file support.
//!
//! Settings live in an INI file (`config.ini`) with one section per
//! component:
//!
//! | Section      | Configures                                        |
//! |--------------|---------------------------------------------------|
//! | `[capacity]` | [`CapacityConfig`](crate::capacity::CapacityConfig) |
//! | `[encoding]` | [`EncodeSettings`](crate::encoder::EncodeSettings)  |
//! | `[memory]`   | [`MemoryPolicyConfig`](crate::memory::MemoryPolicyConfig) |
//!
//! Sizes accept plain byte counts or binary units (`32MB`, `1GiB`).
//! Individual settings are addressed as `section.key` through [`ConfigKey`].

mod error;
mod file;
mod keys;
mod size;

pub use error::ConfigError;
pub use file::{config_file_path, ConfigFile, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use keys::ConfigKey;
pub use size::{format_size, parse_size};
