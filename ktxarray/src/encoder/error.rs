//! Error types for encoding sessions.

use thiserror::Error;

use crate::capacity::CapacityError;

/// Errors that can occur while driving the external encoder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// No source images were supplied.
    #[error("No input layers provided")]
    NoSources,

    /// A source image carried no bytes.
    #[error("Layer {index}: missing data")]
    MissingData { index: usize },

    /// HDR sources (`exr`, `hdr`) are not supported by the LDR pipeline.
    #[error("Layer {index}: HDR source files are not supported ({extension})")]
    HdrSource { index: usize, extension: String },

    /// The encoder produced zero bytes: the destination buffer was too
    /// small or the inputs were inconsistent. Never retried.
    #[error(
        "Encoder produced no output for {layers} layer(s) with a {capacity} byte buffer; \
         buffer may be too small or inputs mismatched"
    )]
    CapacityUnderestimate { capacity: usize, layers: usize },

    /// The encoder reported a failure of its own.
    #[error("Encoder failed: {0}")]
    Encoder(String),

    /// Buffer sizing parameters were unusable.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}
