//! Error types for capacity estimation.

use thiserror::Error;

/// Errors raised by an invalid estimator configuration.
///
/// Estimation itself never fails: unreadable inputs fall back to the
/// configured default dimension.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapacityError {
    /// The clamp band is inverted.
    #[error("Invalid size bounds: min {min} exceeds max {max}")]
    InvalidBounds { min: usize, max: usize },

    /// The safety multiplier is below 1.0 or not finite.
    #[error("Invalid safety multiplier: {0}")]
    InvalidMultiplier(f64),

    /// The fallback dimension is zero.
    #[error("Fallback dimension must be positive")]
    InvalidFallback,

    /// Unrecognised sizing model name.
    #[error("Unknown sizing model '{0}' (expected 'pixel' or 'block')")]
    UnknownModel(String),
}
