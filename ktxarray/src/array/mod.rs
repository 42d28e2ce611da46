//! Texture array assembly.
//!
//! Builds one multi-layer compressed texture from N independently encoded
//! single-layer textures. Assembly runs in two passes over caller-owned
//! data:
//!
//! 1. [`normalize_slices`] resolves every level to a flat buffer and checks
//!    that all slices agree on format, mip count and base dimensions.
//! 2. [`flatten_slices`] reflows the per-slice mip chains into one buffer per
//!    mip level, layers concatenated in input order.
//!
//! Either pass failing aborts the call; partial array textures are never
//! returned.

mod error;
mod flatten;
mod normalize;
mod types;

pub use error::{ArrayError, Mismatch};
pub use flatten::{assemble_array, flatten_slices};
pub use normalize::normalize_slices;
pub use types::{ArrayMipLevel, ArrayTexture, NormalizedLevel, NormalizedSlice};
