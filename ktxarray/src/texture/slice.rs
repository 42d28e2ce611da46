//! Single-layer compressed texture types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque compression format identity.
///
/// The assembler never interprets the value; it only checks that every
/// slice of an array carries the same one. KTX2 sources use the Vulkan
/// format number (e.g. 171 for `ASTC_4x4_SRGB_BLOCK`). Basis Universal
/// output declares `VK_FORMAT_UNDEFINED` and names its block format in the
/// DFD color model instead, so the identity is the `(vkFormat, colorModel)`
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureFormat {
    code: u32,
    model: u8,
}

impl TextureFormat {
    /// UASTC blocks (`VK_FORMAT_UNDEFINED`, `KHR_DF_MODEL_UASTC`).
    pub const UASTC: Self = Self::from_color_model(166);

    /// ETC1S blocks (`VK_FORMAT_UNDEFINED`, `KHR_DF_MODEL_ETC1S`).
    pub const ETC1S: Self = Self::from_color_model(163);

    /// Wrap a raw Vulkan format code.
    pub const fn new(code: u32) -> Self {
        Self { code, model: 0 }
    }

    /// Format with an undefined Vulkan code, identified by its DFD color model.
    pub const fn from_color_model(model: u8) -> Self {
        Self { code: 0, model }
    }

    /// The raw Vulkan format code, 0 when undefined.
    pub const fn code(self) -> u32 {
        self.code
    }

    /// The DFD color model, 0 when the Vulkan code is authoritative.
    pub const fn color_model(self) -> u8 {
        self.model
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.model) {
            (0, 166) => write!(f, "UASTC"),
            (0, 163) => write!(f, "ETC1S"),
            (0, model) => write!(f, "model#{}", model),
            (code, _) => write!(f, "format#{}", code),
        }
    }
}

/// Color space tag carried through to the array texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    /// sRGB transfer function.
    Srgb,
    /// Linear transfer function.
    Linear,
}

/// Byte payload of one mip level.
///
/// Decoders produce either a flat buffer or, for compatibility with loaders
/// that wrap each level in a per-layer list, a container of flat buffers.
/// The normalizer resolves this once; nothing downstream sees `Layered`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MipLevelData {
    /// One contiguous compressed-block buffer.
    Flat(Vec<u8>),
    /// Per-layer container of flat buffers.
    Layered(Vec<Vec<u8>>),
}

impl MipLevelData {
    /// Total byte count across all contained buffers.
    pub fn byte_len(&self) -> usize {
        match self {
            MipLevelData::Flat(bytes) => bytes.len(),
            MipLevelData::Layered(layers) => layers.iter().map(Vec::len).sum(),
        }
    }
}

impl From<Vec<u8>> for MipLevelData {
    fn from(bytes: Vec<u8>) -> Self {
        MipLevelData::Flat(bytes)
    }
}

/// One level of a mip chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Level width in pixels.
    pub width: u32,
    /// Level height in pixels.
    pub height: u32,
    /// Compressed bytes for exactly one layer at this level.
    pub data: MipLevelData,
}

impl MipLevel {
    /// Create a level with arbitrary data shape.
    pub fn new(width: u32, height: u32, data: MipLevelData) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a level backed by a flat buffer.
    pub fn flat(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self::new(width, height, MipLevelData::Flat(data))
    }

    /// Create a level backed by a per-layer container.
    pub fn layered(width: u32, height: u32, layers: Vec<Vec<u8>>) -> Self {
        Self::new(width, height, MipLevelData::Layered(layers))
    }
}

/// One fully encoded, single-layer texture.
///
/// # Fallback image
///
/// Some loaders report an empty mip chain and expose the base level only as
/// a top-level image. `image` carries that; the normalizer synthesizes a
/// one-level chain from it when `mip_chain` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedSlice {
    /// Compression format code.
    pub format: TextureFormat,
    /// Mip levels, index 0 = base (finest).
    pub mip_chain: Vec<MipLevel>,
    /// Optional color space tag.
    pub color_space: Option<ColorSpace>,
    /// Top-level base image used when `mip_chain` is empty.
    pub image: Option<MipLevel>,
}

impl CompressedSlice {
    /// Create an empty slice of the given format.
    pub fn new(format: TextureFormat) -> Self {
        Self {
            format,
            mip_chain: Vec::new(),
            color_space: None,
            image: None,
        }
    }

    /// Append a mip level.
    pub fn with_level(mut self, level: MipLevel) -> Self {
        self.mip_chain.push(level);
        self
    }

    /// Set the color space tag.
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = Some(color_space);
        self
    }

    /// Set the top-level fallback image.
    pub fn with_image(mut self, image: MipLevel) -> Self {
        self.image = Some(image);
        self
    }

    /// Number of mip levels in the chain.
    pub fn mip_count(&self) -> usize {
        self.mip_chain.len()
    }
}

/// Dimension of mip `level` for a base dimension: halved, floored, min 1.
#[inline]
pub fn mip_dimension(base: u32, level: u32) -> u32 {
    base.checked_shr(level).unwrap_or(0).max(1)
}
