//! Decoded-metadata dimension probing.
//!
//! Format-agnostic counterpart to header sniffing: asks the `image` crate
//! for authoritative dimensions. Decoding runs on a blocking task so the
//! caller's runtime is never stalled by a large source image.

use std::io::Cursor;

use bytes::Bytes;
use image::{ImageFormat, ImageReader};

/// Clean a file extension hint: strip query/fragment and lowercase.
///
/// ```
/// use ktxarray::capacity::clean_extension;
///
/// assert_eq!(clean_extension("PNG?v=2"), "png");
/// assert_eq!(clean_extension("jpg#frag"), "jpg");
/// ```
pub fn clean_extension(extension: &str) -> String {
    extension
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('.')
        .to_lowercase()
}

/// Probe image dimensions by decoding the container header.
///
/// The format is guessed from the content first, then from the extension
/// hint. Returns `None` if neither identifies a decodable image.
pub fn probe_dimensions(data: &[u8], extension_hint: Option<&str>) -> Option<(u32, u32)> {
    let mut reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;

    if reader.format().is_none() {
        let format = extension_hint
            .map(clean_extension)
            .and_then(ImageFormat::from_extension)?;
        reader.set_format(format);
    }

    reader.into_dimensions().ok()
}

/// Asynchronous wrapper around [`probe_dimensions`].
///
/// The single suspension point is the blocking-task join. A panicked or
/// cancelled decode is reported as unknown dimensions.
pub async fn probe_dimensions_async(data: Bytes, extension_hint: Option<String>) -> Option<(u32, u32)> {
    let joined =
        tokio::task::spawn_blocking(move || probe_dimensions(&data, extension_hint.as_deref()))
            .await;

    match joined {
        Ok(dimensions) => dimensions,
        Err(e) => {
            tracing::warn!(error = %e, "Image probe task failed");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use image::{ImageFormat, RgbaImage};

    /// Encode a blank image in the given container format.
    pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let image = RgbaImage::new(width, height);
        let mut buffer = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(image)
                .to_rgb8()
                .write_to(&mut buffer, format)
                .expect("jpeg encode"),
            _ => image.write_to(&mut buffer, format).expect("image encode"),
        }
        buffer.into_inner()
    }
}
