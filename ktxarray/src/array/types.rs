//! Normalized slices and the assembled array texture.

use std::ops::Range;

use crate::texture::{ColorSpace, TextureFormat};

/// One level of a normalized slice: always a single flat buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLevel {
    /// Level width in pixels.
    pub width: u32,
    /// Level height in pixels.
    pub height: u32,
    /// Compressed bytes of this level for one layer.
    pub data: Vec<u8>,
}

/// A slice whose every level has been resolved to one flat buffer.
///
/// Produced only by [`normalize_slices`](super::normalize_slices), which
/// also guarantees that all slices of one call share format, level count
/// and base dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSlice {
    pub(crate) format: TextureFormat,
    pub(crate) color_space: Option<ColorSpace>,
    pub(crate) levels: Vec<NormalizedLevel>,
}

impl NormalizedSlice {
    /// Compression format code.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Color space tag.
    pub fn color_space(&self) -> Option<ColorSpace> {
        self.color_space
    }

    /// Normalized mip levels, base first.
    pub fn levels(&self) -> &[NormalizedLevel] {
        &self.levels
    }

    /// Number of mip levels.
    pub fn mip_count(&self) -> usize {
        self.levels.len()
    }

    /// Base level dimensions.
    pub fn base_dimensions(&self) -> (u32, u32) {
        self.levels
            .first()
            .map(|level| (level.width, level.height))
            .unwrap_or((0, 0))
    }
}

/// One mip level of an array texture.
///
/// `data` holds every layer's bytes for this level, layer 0 first, with no
/// padding. Layer K starts at the sum of the byte lengths of layers `0..K`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMipLevel {
    width: u32,
    height: u32,
    data: Vec<u8>,
    layer_lengths: Vec<usize>,
}

impl ArrayMipLevel {
    pub(crate) fn new(width: u32, height: u32, data: Vec<u8>, layer_lengths: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), layer_lengths.iter().sum::<usize>());
        Self {
            width,
            height,
            data,
            layer_lengths,
        }
    }

    /// Width shared by every layer at this level.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height shared by every layer at this level.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Concatenated layer bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of layers at this level.
    pub fn layer_count(&self) -> usize {
        self.layer_lengths.len()
    }

    /// Byte range of `layer` within [`data`](Self::data).
    pub fn layer_range(&self, layer: usize) -> Option<Range<usize>> {
        let len = *self.layer_lengths.get(layer)?;
        let start: usize = self.layer_lengths[..layer].iter().sum();
        Some(start..start + len)
    }

    /// Bytes of one layer.
    pub fn layer(&self, layer: usize) -> Option<&[u8]> {
        self.layer_range(layer).map(|range| &self.data[range])
    }

    /// Iterate over layers in order.
    pub fn layers(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let mut offset = 0;
        self.layer_lengths.iter().map(move |&len| {
            let bytes = &self.data[offset..offset + len];
            offset += len;
            bytes
        })
    }
}

/// A multi-layer compressed texture ready for upload.
///
/// Built once by the flattener and never mutated afterwards; there are no
/// `&mut` accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayTexture {
    format: TextureFormat,
    depth: usize,
    color_space: Option<ColorSpace>,
    levels: Vec<ArrayMipLevel>,
}

impl ArrayTexture {
    pub(crate) fn new(
        format: TextureFormat,
        depth: usize,
        color_space: Option<ColorSpace>,
        levels: Vec<ArrayMipLevel>,
    ) -> Self {
        Self {
            format,
            depth,
            color_space,
            levels,
        }
    }

    /// Compression format shared by all layers.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Number of layers (equal to the number of input slices).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Color space taken from the first slice.
    pub fn color_space(&self) -> Option<ColorSpace> {
        self.color_space
    }

    /// Mip levels, base first.
    pub fn levels(&self) -> &[ArrayMipLevel] {
        &self.levels
    }

    /// Number of mip levels.
    pub fn mip_count(&self) -> usize {
        self.levels.len()
    }

    /// Base level width.
    pub fn width(&self) -> u32 {
        self.levels.first().map(ArrayMipLevel::width).unwrap_or(0)
    }

    /// Base level height.
    pub fn height(&self) -> u32 {
        self.levels.first().map(ArrayMipLevel::height).unwrap_or(0)
    }

    /// Total payload bytes across all levels.
    pub fn byte_len(&self) -> usize {
        self.levels.iter().map(|level| level.data.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> ArrayMipLevel {
        ArrayMipLevel::new(4, 4, vec![0, 0, 1, 1, 1, 2], vec![2, 3, 1])
    }

    #[test]
    fn test_layer_ranges() {
        let level = level();
        assert_eq!(level.layer_count(), 3);
        assert_eq!(level.layer_range(0), Some(0..2));
        assert_eq!(level.layer_range(1), Some(2..5));
        assert_eq!(level.layer_range(2), Some(5..6));
        assert_eq!(level.layer_range(3), None);
    }

    #[test]
    fn test_layer_bytes() {
        let level = level();
        assert_eq!(level.layer(1), Some(&[1u8, 1, 1][..]));
        let collected: Vec<&[u8]> = level.layers().collect();
        assert_eq!(collected, vec![&[0u8, 0][..], &[1, 1, 1][..], &[2][..]]);
    }

    #[test]
    fn test_array_texture_accessors() {
        let texture = ArrayTexture::new(TextureFormat::new(3), 3, None, vec![level()]);
        assert_eq!(texture.depth(), 3);
        assert_eq!(texture.mip_count(), 1);
        assert_eq!((texture.width(), texture.height()), (4, 4));
        assert_eq!(texture.byte_len(), 6);
    }
}
