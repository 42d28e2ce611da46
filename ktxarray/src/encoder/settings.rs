//! Per-call encoder settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Basis Universal intermediate format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    /// ETC1S: small files, lower quality.
    Etc1s,
    /// UASTC LDR 4×4: 16 bytes per block, high quality.
    #[default]
    Uastc,
}

impl FormatMode {
    /// Numeric code passed to the encoder.
    pub fn code(&self) -> u32 {
        match self {
            FormatMode::Etc1s => 0,
            FormatMode::Uastc => 1,
        }
    }

    /// Name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatMode::Etc1s => "etc1s",
            FormatMode::Uastc => "uastc",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "etc1s" | "0" => Ok(FormatMode::Etc1s),
            "uastc" | "1" => Ok(FormatMode::Uastc),
            other => Err(format!("unknown format mode '{}'", other)),
        }
    }
}

/// Settings handed to the encoder with every request.
///
/// Passed explicitly per call; there is no process-wide settings state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// Allow the threaded encoder build (still subject to the memory policy).
    pub multithreading: bool,
    /// UASTC pack level (0 fastest, 4 slowest).
    pub uastc_quality: u32,
    /// Rate-distortion optimisation for UASTC.
    pub rdo_enabled: bool,
    /// RDO quality scalar (lower is higher quality).
    pub rdo_quality: f32,
    /// Perceptual (sRGB) encoding and sRGB transfer function in the output.
    pub srgb: bool,
    /// Generate a mip chain.
    pub mipmaps: bool,
    /// Intermediate format.
    pub format_mode: FormatMode,
    /// Zstandard supercompression of the KTX2 level data.
    pub supercompression: bool,
}

impl EncodeSettings {
    /// Settings for a single texture: mips generated, zstd enabled.
    pub fn single_image() -> Self {
        Self {
            multithreading: true,
            uastc_quality: 1,
            rdo_enabled: false,
            rdo_quality: 1.0,
            srgb: true,
            mipmaps: true,
            format_mode: FormatMode::Uastc,
            supercompression: true,
        }
    }

    /// Settings for a texture array: no mips, no supercompression so the
    /// output can be sliced and reassembled.
    pub fn texture_array() -> Self {
        Self {
            mipmaps: false,
            supercompression: false,
            ..Self::single_image()
        }
    }

    /// Enable or disable mip generation.
    pub fn with_mipmaps(mut self, mipmaps: bool) -> Self {
        self.mipmaps = mipmaps;
        self
    }

    /// Enable or disable the threaded encoder build.
    pub fn with_multithreading(mut self, multithreading: bool) -> Self {
        self.multithreading = multithreading;
        self
    }

    /// Enable RDO with the given quality scalar.
    pub fn with_rdo(mut self, quality: f32) -> Self {
        self.rdo_enabled = true;
        self.rdo_quality = quality;
        self
    }
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self::texture_array()
    }
}
