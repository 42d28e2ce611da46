//! Capacity estimation parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CapacityError;

/// Fallback square dimension when the image size cannot be determined.
pub const DEFAULT_FALLBACK_DIMENSION: u32 = 1024;

/// Fixed allowance for container headers and metadata.
pub const DEFAULT_HEADER_ALLOWANCE: usize = 4096;

/// Lower bound of the clamp band (1 MiB).
pub const DEFAULT_MIN_SIZE: usize = 1024 * 1024;

/// Upper bound of the clamp band for texture arrays (32 MiB).
pub const ARRAY_MAX_SIZE: usize = 32 * 1024 * 1024;

/// Upper bound of the clamp band for single images (16 MiB).
///
/// Single images use a lower ceiling because larger reservations exhaust
/// 32-bit WASM linear memory on mobile browsers.
pub const SINGLE_IMAGE_MAX_SIZE: usize = 16 * 1024 * 1024;

/// Growth factor of a full mip chain over the base level.
pub const MIP_CHAIN_MULTIPLIER: f64 = 1.33;

/// Approximate UASTC output density (8 bits per pixel).
pub const APPROX_BYTES_PER_PIXEL: f64 = 1.0;

/// Bytes per 4×4 block for UASTC/BC7-class formats.
pub const BLOCK_BYTES: usize = 16;

/// Block edge length in pixels.
pub const BLOCK_DIM: u32 = 4;

/// How per-layer byte cost is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingModel {
    /// ~1 byte per pixel, scaled by the mip and safety multipliers.
    #[default]
    PixelApprox,
    /// Exact 16 bytes per 4×4 block, summed over the mip chain.
    BlockAccurate,
}

impl SizingModel {
    /// Name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SizingModel::PixelApprox => "pixel",
            SizingModel::BlockAccurate => "block",
        }
    }
}

impl fmt::Display for SizingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizingModel {
    type Err = CapacityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pixel" | "pixel_approx" => Ok(SizingModel::PixelApprox),
            "block" | "block_accurate" => Ok(SizingModel::BlockAccurate),
            other => Err(CapacityError::UnknownModel(other.to_string())),
        }
    }
}

/// Parameters of the sizing formula.
///
/// Use [`CapacityConfig::texture_array`] (the default) when encoding several
/// layers into one file and [`CapacityConfig::single_image`] for a single
/// texture with a generated mip chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Per-layer cost model.
    pub model: SizingModel,

    /// Whether the encoder will generate mip levels.
    pub mipmaps: bool,

    /// Multiplier applied by the pixel model on top of the mip multiplier.
    pub safety_multiplier: f64,

    /// Fixed bytes added for headers and metadata.
    pub header_allowance: usize,

    /// Square dimension assumed when the source size is unknown.
    pub fallback_dimension: u32,

    /// Inclusive lower bound of the result.
    pub min_size: usize,

    /// Inclusive upper bound of the result.
    pub max_size: usize,
}

impl CapacityConfig {
    /// Parameters for a multi-layer texture array (no mip generation).
    pub fn texture_array() -> Self {
        Self {
            model: SizingModel::PixelApprox,
            mipmaps: false,
            safety_multiplier: 1.6,
            header_allowance: DEFAULT_HEADER_ALLOWANCE,
            fallback_dimension: DEFAULT_FALLBACK_DIMENSION,
            min_size: DEFAULT_MIN_SIZE,
            max_size: ARRAY_MAX_SIZE,
        }
    }

    /// Parameters for a single texture with a full mip chain.
    pub fn single_image() -> Self {
        Self {
            model: SizingModel::PixelApprox,
            mipmaps: true,
            safety_multiplier: 1.5,
            header_allowance: DEFAULT_HEADER_ALLOWANCE,
            fallback_dimension: DEFAULT_FALLBACK_DIMENSION,
            min_size: DEFAULT_MIN_SIZE,
            max_size: SINGLE_IMAGE_MAX_SIZE,
        }
    }

    /// Set the sizing model.
    pub fn with_model(mut self, model: SizingModel) -> Self {
        self.model = model;
        self
    }

    /// Enable or disable mip generation.
    pub fn with_mipmaps(mut self, mipmaps: bool) -> Self {
        self.mipmaps = mipmaps;
        self
    }

    /// Set the clamp band.
    pub fn with_bounds(mut self, min_size: usize, max_size: usize) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Check that the parameters describe a usable formula.
    pub fn validate(&self) -> Result<(), CapacityError> {
        if self.min_size > self.max_size {
            return Err(CapacityError::InvalidBounds {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if !self.safety_multiplier.is_finite() || self.safety_multiplier < 1.0 {
            return Err(CapacityError::InvalidMultiplier(self.safety_multiplier));
        }
        if self.fallback_dimension == 0 {
            return Err(CapacityError::InvalidFallback);
        }
        Ok(())
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self::texture_array()
    }
}
