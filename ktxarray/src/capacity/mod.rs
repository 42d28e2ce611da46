//! Encoder destination buffer sizing.
//!
//! The external encoder writes into a caller-allocated buffer and reports
//! zero output bytes if it runs out of room. Too small a buffer is a hard
//! failure; too large a buffer exhausts WASM linear memory on constrained
//! devices. This module predicts a safe ceiling.
//!
//! # Formula
//!
//! ```text
//! dimension  = min(width, height)          (fallback: 1024)
//! per_layer  = pixel:  d² × 1.0 × mip(1.33|1.0) × safety
//!              block:  Σ ceil(w/4) × ceil(h/4) × 16   (down to 1×1 if mips)
//! total      = per_layer × max(1, layers) + header_allowance
//! result     = clamp(total, min_size, max_size)
//! ```
//!
//! Both the pixel approximation and the block-accurate sum are kept as
//! selectable [`SizingModel`]s.

mod config;
mod decoded;
mod error;
mod estimator;
mod sniff;

pub use config::{
    CapacityConfig, SizingModel, ARRAY_MAX_SIZE, DEFAULT_FALLBACK_DIMENSION,
    DEFAULT_HEADER_ALLOWANCE, DEFAULT_MIN_SIZE, SINGLE_IMAGE_MAX_SIZE,
};
pub use decoded::{clean_extension, probe_dimensions, probe_dimensions_async};
pub use error::CapacityError;
pub use estimator::{block_chain_bytes, CapacityEstimate, CapacityEstimator, DimensionSource};
pub use sniff::{is_png, sniff_png_dimensions, PNG_SIGNATURE};
