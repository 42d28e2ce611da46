//! Compressed texture data model.
//!
//! These types describe what a decoder hands to the array assembler: one
//! fully encoded, single-layer texture per [`CompressedSlice`], with its mip
//! chain stored as opaque compressed-block bytes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   Decoder / loader  │  (ktx2::read_slice, or caller-provided)
//! └──────────┬──────────┘
//!            │ CompressedSlice × N
//!            ▼
//! ┌─────────────────────┐
//! │  array::normalize   │  MipLevelData resolved once
//! └──────────┬──────────┘
//!            │ NormalizedSlice × N
//!            ▼
//! ┌─────────────────────┐
//! │  array::flatten     │  layer-major within each level
//! └──────────┬──────────┘
//!            │ ArrayTexture
//!            ▼
//!        renderer
//! ```
//!
//! # Example
//!
//! ```
//! use ktxarray::texture::{CompressedSlice, MipLevel, TextureFormat};
//!
//! let slice = CompressedSlice::new(TextureFormat::new(171))
//!     .with_level(MipLevel::flat(8, 8, vec![0u8; 64]))
//!     .with_level(MipLevel::flat(4, 4, vec![0u8; 16]));
//!
//! assert_eq!(slice.mip_count(), 2);
//! ```

mod slice;

pub use slice::{mip_dimension, ColorSpace, CompressedSlice, MipLevel, MipLevelData, TextureFormat};
