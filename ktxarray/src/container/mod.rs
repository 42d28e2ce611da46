//! KTX2 container I/O.
//!
//! The loader side turns one encoded single-layer KTX2 file into a
//! [`CompressedSlice`](crate::texture::CompressedSlice); the writer side
//! serializes an assembled [`ArrayTexture`](crate::array::ArrayTexture) as a
//! KTX2 2D array the renderer can upload directly.
//!
//! ```text
//! encoder output (KTX2, 1 layer) × N
//!         │ read_slice
//!         ▼
//! CompressedSlice × N ──► assemble_array ──► ArrayTexture
//!                                                 │ write_array (+ raw_dfd of slice 0)
//!                                                 ▼
//!                                         KTX2, layerCount = N
//! ```
//!
//! Parsing, validation and the header, index and level-index layouts come
//! from the `ktx2` crate. Only uncompressed level data
//! (`supercompressionScheme = 0`) is produced.

mod error;
mod reader;
mod writer;

pub use error::Ktx2Error;
pub use reader::{read_header, read_slice};
pub use writer::{raw_dfd, write_array};

/// Alignment of each level's data (LCM of the 16-byte block size and 4).
pub(crate) const LEVEL_ALIGNMENT: usize = 16;
