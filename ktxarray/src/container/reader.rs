//! Single-layer KTX2 decoding.

use ktx2::{DfdBlockBasic, DfdBlockHeaderBasic, Reader, TransferFunction};

use super::error::Ktx2Error;
use crate::texture::{mip_dimension, ColorSpace, CompressedSlice, MipLevel, TextureFormat};

/// Parse and validate the header of a KTX2 file.
pub fn read_header(bytes: &[u8]) -> Result<ktx2::Header, Ktx2Error> {
    let reader = Reader::new(bytes)?;
    Ok(reader.header())
}

/// Decode a single-layer 2D KTX2 file into a [`CompressedSlice`].
///
/// The format is the header's `vkFormat`. Basis Universal output leaves it
/// undefined and names the block format in the DFD color model instead; the
/// slice then gets [`TextureFormat::from_color_model`]. The file must use no
/// supercompression and hold one face of one layer. Every level becomes a
/// flat buffer. The color space is taken from the DFD transfer function when
/// it is sRGB or linear.
///
/// # Errors
///
/// - [`Ktx2Error::Parse`] if the container is malformed
/// - [`Ktx2Error::MissingFormat`] for `VK_FORMAT_UNDEFINED` with no DFD color model
/// - [`Ktx2Error::Supercompressed`] for zstd/zlib/BasisLZ level data
/// - [`Ktx2Error::NotSingleLayer`] for cubemaps, 3D textures and arrays
pub fn read_slice(bytes: &[u8]) -> Result<CompressedSlice, Ktx2Error> {
    let reader = Reader::new(bytes)?;
    let header = reader.header();
    let basic = basic_dfd_header(&reader);

    let format = match (header.format, basic.and_then(|b| b.color_model)) {
        (Some(format), _) => TextureFormat::new(format.value()),
        (None, Some(model)) => TextureFormat::from_color_model(model.value()),
        (None, None) => return Err(Ktx2Error::MissingFormat),
    };

    if header.supercompression_scheme.is_some() {
        return Err(Ktx2Error::Supercompressed);
    }
    if header.face_count != 1 {
        return Err(Ktx2Error::NotSingleLayer(format!(
            "{} faces",
            header.face_count
        )));
    }
    if header.pixel_depth > 1 {
        return Err(Ktx2Error::NotSingleLayer(format!(
            "pixel depth {}",
            header.pixel_depth
        )));
    }
    if header.layer_count > 1 {
        return Err(Ktx2Error::NotSingleLayer(format!(
            "{} layers",
            header.layer_count
        )));
    }

    let mut slice = CompressedSlice::new(format);

    for (index, level) in reader.levels().enumerate() {
        let index = index as u32;
        slice = slice.with_level(MipLevel::flat(
            mip_dimension(header.pixel_width, index),
            mip_dimension(header.pixel_height.max(1), index),
            level.data.to_vec(),
        ));
    }

    let transfer = basic.and_then(|b| b.transfer_function);
    if transfer == Some(TransferFunction::SRGB) {
        slice = slice.with_color_space(ColorSpace::Srgb);
    } else if transfer == Some(TransferFunction::Linear) {
        slice = slice.with_color_space(ColorSpace::Linear);
    }

    tracing::debug!(
        format = %format,
        width = header.pixel_width,
        height = header.pixel_height,
        levels = slice.mip_count(),
        "Decoded KTX2 slice"
    );

    Ok(slice)
}

/// Header of the first Khronos basic DFD block.
fn basic_dfd_header(reader: &Reader<&[u8]>) -> Option<DfdBlockHeaderBasic> {
    reader
        .dfd_blocks()
        .filter(|block| block.header.vendor_id == 0 && block.header.descriptor_type == 0)
        .find_map(|block| DfdBlockBasic::parse(block.data).ok())
        .map(|basic| basic.header)
}
