//! Error types for KTX2 container I/O.

use thiserror::Error;

/// Errors reading a single-layer KTX2 file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ktx2Error {
    /// The file is not a well-formed KTX2 container.
    #[error("Invalid KTX2 file: {0}")]
    Parse(String),

    /// `VK_FORMAT_UNDEFINED` without a DFD color model to stand in for it.
    #[error("KTX2 file does not specify a format")]
    MissingFormat,

    /// Supercompressed level data cannot be concatenated byte-wise.
    #[error("KTX2 file uses supercompression, which is not supported")]
    Supercompressed,

    /// Cubemaps, 3D textures and arrays cannot be used as slices.
    #[error("KTX2 file is not a single-layer 2D texture: {0}")]
    NotSingleLayer(String),
}

impl From<ktx2::ParseError> for Ktx2Error {
    fn from(err: ktx2::ParseError) -> Self {
        Ktx2Error::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Ktx2Error::NotSingleLayer("6 faces".to_string()).to_string(),
            "KTX2 file is not a single-layer 2D texture: 6 faces"
        );
        assert_eq!(
            Ktx2Error::Supercompressed.to_string(),
            "KTX2 file uses supercompression, which is not supported"
        );
    }
}
