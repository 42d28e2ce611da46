//! Slice validation and normalization.
//!
//! Resolves every [`MipLevelData`] to one flat buffer and enforces the
//! cross-slice invariants the flattener relies on. Nothing is resampled or
//! coerced: a mismatch is the caller's error.

use crate::texture::{CompressedSlice, MipLevel, MipLevelData};

use super::error::{ArrayError, Mismatch};
use super::types::{NormalizedLevel, NormalizedSlice};

/// Index every consistency error is reported against.
const REFERENCE_SLICE: usize = 0;

/// Validate and normalize an ordered sequence of slices.
///
/// # Errors
///
/// - [`ArrayError::NoSlices`] for an empty input
/// - [`ArrayError::InputShape`] for a slice with no usable levels, a level
///   with zero width or height, or a container that does not hold exactly
///   one buffer
/// - [`ArrayError::Consistency`] when a slice differs from slice 0 in
///   format, mip count or base dimensions
pub fn normalize_slices(slices: &[CompressedSlice]) -> Result<Vec<NormalizedSlice>, ArrayError> {
    if slices.is_empty() {
        return Err(ArrayError::NoSlices);
    }

    let normalized = slices
        .iter()
        .enumerate()
        .map(|(index, slice)| normalize_slice(index, slice))
        .collect::<Result<Vec<_>, _>>()?;

    check_consistency(&normalized)?;

    Ok(normalized)
}

fn normalize_slice(index: usize, slice: &CompressedSlice) -> Result<NormalizedSlice, ArrayError> {
    let levels = if slice.mip_chain.is_empty() {
        vec![synthesize_base_level(index, slice)?]
    } else {
        slice
            .mip_chain
            .iter()
            .enumerate()
            .map(|(level, mip)| normalize_level(index, level, mip))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(NormalizedSlice {
        format: slice.format,
        color_space: slice.color_space,
        levels,
    })
}

/// Build a one-level chain from the slice's top-level image.
fn synthesize_base_level(index: usize, slice: &CompressedSlice) -> Result<NormalizedLevel, ArrayError> {
    let image = slice
        .image
        .as_ref()
        .ok_or_else(|| ArrayError::shape(index, 0, "empty mip chain and no base image"))?;

    match &image.data {
        MipLevelData::Flat(bytes) if !bytes.is_empty() && image.width > 0 && image.height > 0 => {
            tracing::debug!(
                slice = index,
                width = image.width,
                height = image.height,
                bytes = bytes.len(),
                "Synthesized single-level mip chain from base image"
            );
            Ok(NormalizedLevel {
                width: image.width,
                height: image.height,
                data: bytes.clone(),
            })
        }
        _ => Err(ArrayError::shape(
            index,
            0,
            "empty mip chain and base image is not usable",
        )),
    }
}

fn normalize_level(slice: usize, level: usize, mip: &MipLevel) -> Result<NormalizedLevel, ArrayError> {
    if mip.width == 0 || mip.height == 0 {
        return Err(ArrayError::shape(
            slice,
            level,
            format!("non-positive dimensions {}×{}", mip.width, mip.height),
        ));
    }

    let data = match &mip.data {
        MipLevelData::Flat(bytes) => bytes.clone(),
        MipLevelData::Layered(layers) => match layers.as_slice() {
            [single] => single.clone(),
            [] => return Err(ArrayError::shape(slice, level, "empty layer container")),
            [_, extra, ..] => {
                return Err(ArrayError::layer_shape(
                    slice,
                    level,
                    1,
                    format!(
                        "container holds {} buffers, expected one ({} extra bytes)",
                        layers.len(),
                        extra.len()
                    ),
                ))
            }
        },
    };

    Ok(NormalizedLevel {
        width: mip.width,
        height: mip.height,
        data,
    })
}

pub(super) fn check_consistency(slices: &[NormalizedSlice]) -> Result<(), ArrayError> {
    let Some((reference, rest)) = slices.split_first() else {
        return Ok(());
    };
    let (ref_width, ref_height) = reference.base_dimensions();

    for (offset, slice) in rest.iter().enumerate() {
        let index = offset + 1;

        if slice.format != reference.format {
            return Err(mismatch(index, Mismatch::Format, reference.format, slice.format));
        }

        if slice.mip_count() != reference.mip_count() {
            return Err(mismatch(
                index,
                Mismatch::MipCount,
                reference.mip_count(),
                slice.mip_count(),
            ));
        }

        let (width, height) = slice.base_dimensions();
        if (width, height) != (ref_width, ref_height) {
            return Err(mismatch(
                index,
                Mismatch::BaseDimensions,
                format!("{}×{}", ref_width, ref_height),
                format!("{}×{}", width, height),
            ));
        }
    }

    Ok(())
}

fn mismatch(
    slice: usize,
    kind: Mismatch,
    expected: impl ToString,
    actual: impl ToString,
) -> ArrayError {
    ArrayError::Consistency {
        reference: REFERENCE_SLICE,
        slice,
        kind,
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
