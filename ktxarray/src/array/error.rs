//! Error types for array texture assembly.

use std::fmt;

use thiserror::Error;

/// Which cross-slice property disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// Compression format code.
    Format,
    /// Number of mip levels.
    MipCount,
    /// Level-0 width and height.
    BaseDimensions,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Format => write!(f, "format"),
            Mismatch::MipCount => write!(f, "mip count"),
            Mismatch::BaseDimensions => write!(f, "base dimensions"),
        }
    }
}

/// Errors that abort an assembly call.
///
/// Every variant names the slice it concerns so callers can surface a
/// diagnostic without the library doing any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// No slices were supplied.
    #[error("No slices provided")]
    NoSlices,

    /// A slice's mip or layer data is missing or malformed.
    #[error("Slice {slice}, level {level}{}: {reason}", layer_suffix(.layer))]
    InputShape {
        slice: usize,
        level: usize,
        layer: Option<usize>,
        reason: String,
    },

    /// Two slices disagree on format, mip count or base dimensions.
    #[error(
        "Slice {slice} {kind} mismatch with slice {reference}: expected {expected}, got {actual}"
    )]
    Consistency {
        reference: usize,
        slice: usize,
        kind: Mismatch,
        expected: String,
        actual: String,
    },
}

fn layer_suffix(layer: &Option<usize>) -> String {
    match layer {
        Some(layer) => format!(", layer {}", layer),
        None => String::new(),
    }
}

impl ArrayError {
    /// Shape error without a layer index.
    pub(crate) fn shape(slice: usize, level: usize, reason: impl Into<String>) -> Self {
        ArrayError::InputShape {
            slice,
            level,
            layer: None,
            reason: reason.into(),
        }
    }

    /// Shape error inside a per-layer container.
    pub(crate) fn layer_shape(
        slice: usize,
        level: usize,
        layer: usize,
        reason: impl Into<String>,
    ) -> Self {
        ArrayError::InputShape {
            slice,
            level,
            layer: Some(layer),
            reason: reason.into(),
        }
    }

    /// Index of the offending slice, if any.
    pub fn slice_index(&self) -> Option<usize> {
        match self {
            ArrayError::NoSlices => None,
            ArrayError::InputShape { slice, .. } | ArrayError::Consistency { slice, .. } => {
                Some(*slice)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_shape_display_without_layer() {
        let err = ArrayError::shape(2, 1, "empty container");
        assert_eq!(err.to_string(), "Slice 2, level 1: empty container");
    }

    #[test]
    fn test_input_shape_display_with_layer() {
        let err = ArrayError::layer_shape(0, 3, 1, "not a byte buffer");
        assert_eq!(err.to_string(), "Slice 0, level 3, layer 1: not a byte buffer");
    }

    #[test]
    fn test_consistency_display() {
        let err = ArrayError::Consistency {
            reference: 0,
            slice: 1,
            kind: Mismatch::MipCount,
            expected: "3".to_string(),
            actual: "2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Slice 1 mip count mismatch with slice 0: expected 3, got 2"
        );
    }

    #[test]
    fn test_slice_index() {
        assert_eq!(ArrayError::NoSlices.slice_index(), None);
        assert_eq!(ArrayError::shape(4, 0, "x").slice_index(), Some(4));
    }
}
