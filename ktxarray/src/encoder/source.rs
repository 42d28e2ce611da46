//! Source images fed to the encoder.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::error::EncodeError;
use crate::capacity::clean_extension;

/// Container type of an LDR source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Png,
    Jpeg,
}

/// One encoded source image (PNG or JPEG bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Encoded image bytes.
    pub data: Bytes,
    /// Display name used in logs.
    pub file_name: String,
    /// File extension as supplied by the caller (may carry a query string).
    pub extension: String,
}

impl SourceImage {
    /// Create a source image.
    pub fn new(data: impl Into<Bytes>, file_name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            file_name: file_name.into(),
            extension: extension.into(),
        }
    }

    /// Create a source image named after a path, taking the extension from it.
    pub fn from_path_bytes(path: &std::path::Path, data: impl Into<Bytes>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(data, file_name, extension)
    }

    /// Lowercased extension without query, fragment or leading dot.
    pub fn clean_extension(&self) -> String {
        clean_extension(&self.extension)
    }

    /// Classify the image by extension.
    ///
    /// `jpg`, `jpeg` and `jfif` are JPEG; anything else is passed to the
    /// encoder as PNG.
    pub fn kind(&self) -> SourceKind {
        match self.clean_extension().as_str() {
            "jpg" | "jpeg" | "jfif" => SourceKind::Jpeg,
            _ => SourceKind::Png,
        }
    }

    /// Reject unusable sources before any buffer is allocated.
    pub(crate) fn check(&self, index: usize) -> Result<SourceKind, EncodeError> {
        if self.data.is_empty() {
            return Err(EncodeError::MissingData { index });
        }
        let extension = self.clean_extension();
        if extension == "exr" || extension == "hdr" {
            return Err(EncodeError::HdrSource { index, extension });
        }
        Ok(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_kind_by_extension() {
        assert_eq!(SourceImage::new(vec![1], "a", "JPG").kind(), SourceKind::Jpeg);
        assert_eq!(SourceImage::new(vec![1], "a", ".jfif").kind(), SourceKind::Jpeg);
        assert_eq!(SourceImage::new(vec![1], "a", "jpeg?x=1").kind(), SourceKind::Jpeg);
        assert_eq!(SourceImage::new(vec![1], "a", "png").kind(), SourceKind::Png);
        assert_eq!(SourceImage::new(vec![1], "a", "webp").kind(), SourceKind::Png);
        assert_eq!(SourceImage::new(vec![1], "a", "").kind(), SourceKind::Png);
    }

    #[test]
    fn test_check_rejects_hdr() {
        let source = SourceImage::new(vec![1, 2, 3], "sky", "EXR");
        assert_eq!(
            source.check(3),
            Err(EncodeError::HdrSource {
                index: 3,
                extension: "exr".to_string()
            })
        );
    }

    #[test]
    fn test_check_rejects_empty() {
        let source = SourceImage::new(Vec::new(), "empty", "png");
        assert_eq!(source.check(1), Err(EncodeError::MissingData { index: 1 }));
    }

    #[test]
    fn test_from_path() {
        let source = SourceImage::from_path_bytes(Path::new("/tmp/layer_0.jpeg"), vec![1]);
        assert_eq!(source.file_name, "layer_0.jpeg");
        assert_eq!(source.kind(), SourceKind::Jpeg);
    }
}
