//! Container header sniffing.
//!
//! Reads image dimensions straight from fixed header offsets without
//! decoding any pixel data.

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Offset of the IHDR width field (signature + chunk length + chunk type).
const PNG_WIDTH_OFFSET: usize = 16;

/// Offset of the IHDR height field.
const PNG_HEIGHT_OFFSET: usize = 20;

/// Returns true if `data` starts with the PNG signature.
pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

/// Read PNG width and height from the IHDR chunk.
///
/// Returns `None` if the signature is missing or the buffer is too short.
/// Zero dimensions are returned as-is; the estimator treats them as unknown.
///
/// # Example
///
/// ```
/// use ktxarray::capacity::{sniff_png_dimensions, PNG_SIGNATURE};
///
/// let mut header = PNG_SIGNATURE.to_vec();
/// header.extend_from_slice(&[0, 0, 0, 13]);
/// header.extend_from_slice(b"IHDR");
/// header.extend_from_slice(&512u32.to_be_bytes());
/// header.extend_from_slice(&256u32.to_be_bytes());
///
/// assert_eq!(sniff_png_dimensions(&header), Some((512, 256)));
/// ```
pub fn sniff_png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if !is_png(data) {
        return None;
    }
    let width = read_u32_be(data, PNG_WIDTH_OFFSET)?;
    let height = read_u32_be(data, PNG_HEIGHT_OFFSET)?;
    Some((width, height))
}

fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::PNG_SIGNATURE;

    /// Minimal PNG prefix: signature plus an IHDR chunk header.
    pub fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data
    }
}
