//! Encoder seam.
//!
//! The KTX2 encoder itself (Basis Universal compiled to WASM) is external.
//! This module owns everything around it: validating sources, sizing the
//! destination buffer, reconciling the threading request with the
//! [`MemoryProfile`](crate::memory::MemoryProfile), and turning a zero-byte
//! result into a typed error.
//!
//! ```text
//! SourceImage × N ──► EncodeSession ──► KtxEncoder::encode ──► EncodedTexture
//!                       │  ▲
//!     CapacityEstimator ┘  └ MemoryProfile
//! ```
//!
//! Settings are passed per session; nothing is stored globally.

mod error;
mod session;
mod settings;
mod source;

pub use error::EncodeError;
pub use session::{EncodeRequest, EncodeSession, EncodedTexture, KtxEncoder, TextureType};
pub use settings::{EncodeSettings, FormatMode};
pub use source::{SourceImage, SourceKind};
