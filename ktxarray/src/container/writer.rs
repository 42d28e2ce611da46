//! KTX2 2D-array serialization.

use ktx2::{Format, Header, Index, LevelIndex};

use super::error::Ktx2Error;
use super::LEVEL_ALIGNMENT;
use crate::array::ArrayTexture;

/// A DFD holding only its `dfdTotalSize` field.
const EMPTY_DFD: [u8; 4] = 4u32.to_le_bytes();

/// Serialize an array texture into a KTX2 file.
///
/// `dfd` is the Data Format Descriptor to embed, typically taken from one of
/// the source slices with [`raw_dfd`] so the color model and transfer
/// function carry over. An empty `dfd` writes a descriptor with no blocks.
/// `vkFormat` is the array's Vulkan code, which stays 0 for Basis formats
/// identified by their DFD color model.
///
/// Level data is written without supercompression, smallest level first,
/// each level starting on a 16-byte boundary. `layerCount` equals the array
/// depth, so a depth of one still produces an array texture.
///
/// # Example
///
/// ```
/// use ktxarray::array::assemble_array;
/// use ktxarray::container::{read_header, write_array};
/// use ktxarray::texture::{CompressedSlice, MipLevel, TextureFormat};
///
/// let slices: Vec<_> = (0..3)
///     .map(|i| CompressedSlice::new(TextureFormat::new(171))
///         .with_level(MipLevel::flat(4, 4, vec![i; 16])))
///     .collect();
/// let array = assemble_array(&slices).unwrap();
///
/// let file = write_array(&array, &[]);
/// let header = read_header(&file).unwrap();
/// assert_eq!(header.layer_count, 3);
/// ```
pub fn write_array(array: &ArrayTexture, dfd: &[u8]) -> Vec<u8> {
    let dfd = if dfd.is_empty() { &EMPTY_DFD[..] } else { dfd };
    let level_count = array.mip_count();
    let dfd_offset = Header::LENGTH + level_count * LevelIndex::LENGTH;

    // Level data placement, smallest level first.
    let mut offsets = vec![0usize; level_count];
    let mut cursor = dfd_offset + dfd.len();
    for (index, level) in array.levels().iter().enumerate().rev() {
        cursor = align_up(cursor, LEVEL_ALIGNMENT);
        offsets[index] = cursor;
        cursor += level.data().len();
    }

    let header = Header {
        format: Format::new(array.format().code()),
        type_size: 1,
        pixel_width: array.width(),
        pixel_height: array.height(),
        pixel_depth: 0,
        layer_count: u32::try_from(array.depth()).unwrap_or(u32::MAX),
        face_count: 1,
        level_count: level_count as u32,
        supercompression_scheme: None,
        index: Index {
            dfd_byte_offset: dfd_offset as u32,
            dfd_byte_length: dfd.len() as u32,
            kvd_byte_offset: 0,
            kvd_byte_length: 0,
            sgd_byte_offset: 0,
            sgd_byte_length: 0,
        },
    };

    let mut out = Vec::with_capacity(cursor);
    out.extend_from_slice(&header.as_bytes());

    // Level index, largest level first
    for (level, offset) in array.levels().iter().zip(&offsets) {
        let len = level.data().len() as u64;
        let entry = LevelIndex {
            byte_offset: *offset as u64,
            byte_length: len,
            uncompressed_byte_length: len,
        };
        out.extend_from_slice(&entry.as_bytes());
    }

    out.extend_from_slice(dfd);

    for (index, level) in array.levels().iter().enumerate().rev() {
        out.resize(offsets[index], 0);
        out.extend_from_slice(level.data());
    }

    tracing::debug!(
        format = %array.format(),
        depth = array.depth(),
        levels = level_count,
        bytes = out.len(),
        "Serialized KTX2 array texture"
    );

    out
}

/// Borrow the Data Format Descriptor of a KTX2 file, `dfdTotalSize`
/// included, for re-embedding with [`write_array`].
///
/// # Errors
///
/// [`Ktx2Error::Parse`] if the container is malformed.
pub fn raw_dfd(bytes: &[u8]) -> Result<&[u8], Ktx2Error> {
    let index = ktx2::Reader::new(bytes)?.header().index;
    let start = index.dfd_byte_offset as usize;
    let end = start + index.dfd_byte_length as usize;

    bytes
        .get(start..end)
        .ok_or_else(|| Ktx2Error::Parse(format!("DFD at {}..{} out of bounds", start, end)))
}

fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}
