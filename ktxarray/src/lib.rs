//! ktxarray - KTX2 texture arrays from independently encoded slices
//!
//! This library assembles N single-layer, block-compressed textures (one per
//! source image) into one 2D texture array, sizes the destination buffer for
//! the external Basis Universal encoder, and decides how conservatively that
//! encoder must be configured on memory-constrained browsers.
//!
//! # Modules
//!
//! - [`texture`]: compressed slice data model
//! - [`array`]: slice validation and mip-major flattening
//! - [`capacity`]: encoder destination buffer sizing
//! - [`memory`]: memory-constraint policy and allocation diagnostics
//! - [`encoder`]: the seam around the external encoder
//! - [`container`]: KTX2 file reading and array serialization
//! - [`config`]: `config.ini` support
//! - [`logging`]: subscriber setup for binaries
//!
//! # Example
//!
//! ```
//! use ktxarray::array::assemble_array;
//! use ktxarray::texture::{CompressedSlice, MipLevel, TextureFormat};
//!
//! let slices: Vec<_> = (0..4u8)
//!     .map(|i| CompressedSlice::new(TextureFormat::new(171))
//!         .with_level(MipLevel::flat(64, 64, vec![i; 4096])))
//!     .collect();
//!
//! let array = assemble_array(&slices).unwrap();
//! assert_eq!(array.depth(), 4);
//! assert_eq!(array.levels()[0].data().len(), 16384);
//! ```

pub mod array;
pub mod capacity;
pub mod config;
pub mod container;
pub mod encoder;
pub mod logging;
pub mod memory;
pub mod texture;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
