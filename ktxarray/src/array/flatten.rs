//! Mip-major flattening of normalized slices.
//!
//! Each source slice stores its own mip chain (layer-major). The array
//! texture needs the opposite: one buffer per mip level holding every
//! layer's bytes at that level.
//!
//! ```text
//! slice 0: [L0][L1][L2]          level 0: [s0 L0][s1 L0][s2 L0]
//! slice 1: [L0][L1][L2]   ───►   level 1: [s0 L1][s1 L1][s2 L1]
//! slice 2: [L0][L1][L2]          level 2: [s0 L2][s1 L2][s2 L2]
//! ```
//!
//! Layer order is significant: the renderer maps layer K to depth index K.

use crate::texture::CompressedSlice;

use super::error::ArrayError;
use super::normalize::{check_consistency, normalize_slices};
use super::types::{ArrayMipLevel, ArrayTexture, NormalizedSlice};

/// Reorder normalized slices into an array texture.
///
/// Slices normally come from one [`normalize_slices`] call. Slices from
/// separate calls are checked against slice 0 again before any bytes move;
/// dimensions for each level are taken from slice 0.
///
/// # Errors
///
/// Returns [`ArrayError::Consistency`] if the slices disagree on format, mip
/// count or base dimensions, [`ArrayError::InputShape`] if any layer's
/// buffer at any level is empty, and [`ArrayError::NoSlices`] for an empty
/// input. No partial texture is ever returned.
pub fn flatten_slices(slices: Vec<NormalizedSlice>) -> Result<ArrayTexture, ArrayError> {
    let first = slices.first().ok_or(ArrayError::NoSlices)?;
    check_consistency(&slices)?;
    let format = first.format;
    let color_space = first.color_space;
    let mip_count = first.mip_count();
    let depth = slices.len();

    let mut levels = Vec::with_capacity(mip_count);

    for level in 0..mip_count {
        let (width, height) = {
            let base = &first.levels[level];
            (base.width, base.height)
        };

        let mut layer_lengths = Vec::with_capacity(depth);
        for (layer, slice) in slices.iter().enumerate() {
            let bytes = slice
                .levels
                .get(level)
                .map(|l| l.data.len())
                .ok_or_else(|| ArrayError::shape(layer, level, "missing mip level"))?;
            if bytes == 0 {
                return Err(ArrayError::shape(layer, level, "zero-length level data"));
            }
            layer_lengths.push(bytes);
        }

        let mut data = Vec::with_capacity(layer_lengths.iter().sum());
        for slice in &slices {
            data.extend_from_slice(&slice.levels[level].data);
        }

        levels.push(ArrayMipLevel::new(width, height, data, layer_lengths));
    }

    Ok(ArrayTexture::new(format, depth, color_space, levels))
}

/// Validate, normalize and flatten slices into an array texture.
///
/// This is the one-call entry point used by loaders.
///
/// # Example
///
/// ```
/// use ktxarray::array::assemble_array;
/// use ktxarray::texture::{CompressedSlice, MipLevel, TextureFormat};
///
/// let slices: Vec<CompressedSlice> = (0..3u8)
///     .map(|i| {
///         CompressedSlice::new(TextureFormat::new(171))
///             .with_level(MipLevel::flat(4, 4, vec![i; 16]))
///     })
///     .collect();
///
/// let texture = assemble_array(&slices).unwrap();
/// assert_eq!(texture.depth(), 3);
/// assert_eq!(texture.levels()[0].data().len(), 48);
/// ```
pub fn assemble_array(slices: &[CompressedSlice]) -> Result<ArrayTexture, ArrayError> {
    let normalized = normalize_slices(slices)?;
    let texture = flatten_slices(normalized)?;

    tracing::debug!(
        depth = texture.depth(),
        mips = texture.mip_count(),
        width = texture.width(),
        height = texture.height(),
        bytes = texture.byte_len(),
        format = %texture.format(),
        "Assembled array texture"
    );

    Ok(texture)
}
