//! Encoding sessions: buffer sizing, threading decision and output handling
//! around an external KTX2 encoder.

use std::time::{Duration, Instant};

use super::error::EncodeError;
use super::settings::EncodeSettings;
use super::source::{SourceImage, SourceKind};
use crate::capacity::{CapacityConfig, CapacityEstimate, CapacityEstimator};
use crate::memory::MemoryProfile;

/// Kind of texture the encoder should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    /// A single 2D texture.
    Image2D,
    /// A 2D texture array, one layer per source.
    Array2D,
}

/// Everything the encoder needs for one call.
#[derive(Debug, Clone)]
pub struct EncodeRequest<'a> {
    /// Source images in layer order.
    pub sources: &'a [SourceImage],
    /// Container type of each source, parallel to `sources`.
    pub kinds: Vec<SourceKind>,
    /// Output kind.
    pub texture_type: TextureType,
    /// Effective settings (`multithreading` already reconciled with the
    /// memory profile).
    pub settings: EncodeSettings,
    /// Worker threads to use when `settings.multithreading` is set.
    pub threads: usize,
    /// Initial linear-memory reservation for the encoder instance.
    pub initial_reservation_bytes: u64,
}

/// External KTX2 encoder.
///
/// Writes a complete KTX2 file into `output` and returns the number of
/// bytes written. Returning `Ok(0)` means the buffer was too small or the
/// inputs were inconsistent.
///
/// Implementations are not expected to be safe for concurrent encode calls;
/// callers serialize access to a shared instance.
pub trait KtxEncoder: Send + Sync {
    /// Encode `request` into `output`.
    fn encode(&self, request: &EncodeRequest<'_>, output: &mut [u8]) -> Result<usize, EncodeError>;

    /// Human-readable name of the encoder.
    fn name(&self) -> &str {
        "encoder"
    }
}

/// Result of a successful encode.
#[derive(Debug, Clone)]
pub struct EncodedTexture {
    /// KTX2 file bytes, truncated to what the encoder wrote.
    pub data: Vec<u8>,
    /// Number of layers encoded.
    pub layers: usize,
    /// Buffer estimate the output was written into.
    pub capacity: CapacityEstimate,
    /// Whether the threaded build was used.
    pub threaded: bool,
    /// Wall-clock encode time.
    pub elapsed: Duration,
}

/// Drives an encoder with explicit settings and a memory profile.
///
/// # Example
///
/// ```
/// use ktxarray::capacity::CapacityConfig;
/// use ktxarray::encoder::{EncodeError, EncodeRequest, EncodeSession, EncodeSettings, KtxEncoder, SourceImage};
/// use ktxarray::memory::MemoryProfile;
///
/// struct Echo;
///
/// impl KtxEncoder for Echo {
///     fn encode(&self, request: &EncodeRequest<'_>, output: &mut [u8]) -> Result<usize, EncodeError> {
///         let data = &request.sources[0].data;
///         output[..data.len()].copy_from_slice(data);
///         Ok(data.len())
///     }
/// }
///
/// let session = EncodeSession::new(
///     Echo,
///     EncodeSettings::single_image(),
///     CapacityConfig::single_image(),
///     MemoryProfile::conservative(),
/// )
/// .unwrap();
///
/// let encoded = session.encode_image(&SourceImage::new(vec![1, 2, 3], "a.png", "png")).unwrap();
/// assert_eq!(encoded.data, vec![1, 2, 3]);
/// ```
pub struct EncodeSession<E> {
    encoder: E,
    settings: EncodeSettings,
    estimator: CapacityEstimator,
    profile: MemoryProfile,
}

impl<E: KtxEncoder> EncodeSession<E> {
    /// Create a session.
    ///
    /// The capacity model's mip flag follows `settings.mipmaps`.
    pub fn new(
        encoder: E,
        settings: EncodeSettings,
        capacity: CapacityConfig,
        profile: MemoryProfile,
    ) -> Result<Self, EncodeError> {
        let estimator = CapacityEstimator::new(capacity.with_mipmaps(settings.mipmaps))?;
        Ok(Self {
            encoder,
            settings,
            estimator,
            profile,
        })
    }

    /// The settings requested by the caller.
    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    /// The memory profile in effect.
    pub fn profile(&self) -> &MemoryProfile {
        &self.profile
    }

    /// Whether this session will run the threaded encoder.
    pub fn threaded(&self) -> bool {
        self.settings.multithreading && self.profile.recommend_threaded
    }

    /// Encode one image into a single KTX2 texture.
    pub fn encode_image(&self, source: &SourceImage) -> Result<EncodedTexture, EncodeError> {
        self.run(std::slice::from_ref(source), TextureType::Image2D)
    }

    /// Encode several images into one KTX2 texture array, in order.
    pub fn encode_array(&self, sources: &[SourceImage]) -> Result<EncodedTexture, EncodeError> {
        self.run(sources, TextureType::Array2D)
    }

    fn run(&self, sources: &[SourceImage], texture_type: TextureType) -> Result<EncodedTexture, EncodeError> {
        let first = sources.first().ok_or(EncodeError::NoSources)?;
        let kinds = sources
            .iter()
            .enumerate()
            .map(|(index, source)| source.check(index))
            .collect::<Result<Vec<_>, _>>()?;

        let capacity = self
            .estimator
            .estimate_from_header(&first.data, layer_count(sources.len()));
        let mut output = vec![0u8; capacity.bytes];

        let threaded = self.threaded();
        let threads = if threaded {
            self.profile.recommended_threads.max(1)
        } else {
            1
        };
        let request = EncodeRequest {
            sources,
            kinds,
            texture_type,
            settings: EncodeSettings {
                multithreading: threaded,
                ..self.settings
            },
            threads,
            initial_reservation_bytes: self.profile.recommended_initial_reservation_bytes,
        };

        tracing::info!(
            encoder = self.encoder.name(),
            layers = sources.len(),
            first = %first.file_name,
            buffer_bytes = capacity.bytes,
            threaded,
            threads,
            "Encoding KTX2 texture"
        );

        let start = Instant::now();
        let written = self.encoder.encode(&request, &mut output)?;
        let elapsed = start.elapsed();

        if written == 0 {
            return Err(EncodeError::CapacityUnderestimate {
                capacity: capacity.bytes,
                layers: sources.len(),
            });
        }
        if written > output.len() {
            return Err(EncodeError::Encoder(format!(
                "reported {} bytes written into a {} byte buffer",
                written,
                output.len()
            )));
        }
        output.truncate(written);

        tracing::info!(
            bytes = written,
            elapsed_ms = elapsed.as_millis() as u64,
            "Encoding complete"
        );

        Ok(EncodedTexture {
            data: output,
            layers: sources.len(),
            capacity,
            threaded,
            elapsed,
        })
    }
}

/// Layer count for capacity estimation, saturating at `u32::MAX`.
fn layer_count(sources: usize) -> u32 {
    u32::try_from(sources).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::test_support::png_header;
    use crate::capacity::{DimensionSource, DEFAULT_MIN_SIZE};
    use std::sync::Mutex;

    /// Records what it was asked to do and writes a fixed number of bytes.
    struct MockEncoder {
        output_len: usize,
        seen: Mutex<Vec<(usize, TextureType, bool, usize, usize)>>,
    }

    impl MockEncoder {
        fn writing(output_len: usize) -> Self {
            Self {
                output_len,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl KtxEncoder for MockEncoder {
        fn encode(&self, request: &EncodeRequest<'_>, output: &mut [u8]) -> Result<usize, EncodeError> {
            self.seen.lock().unwrap().push((
                request.sources.len(),
                request.texture_type,
                request.settings.multithreading,
                request.threads,
                output.len(),
            ));
            let n = self.output_len.min(output.len());
            output[..n].fill(0xAB);
            Ok(self.output_len)
        }
    }

    struct FailingEncoder;

    impl KtxEncoder for FailingEncoder {
        fn encode(&self, _: &EncodeRequest<'_>, _: &mut [u8]) -> Result<usize, EncodeError> {
            Err(EncodeError::Encoder("module not loaded".to_string()))
        }
    }

    fn threaded_profile() -> MemoryProfile {
        MemoryProfile {
            estimated_available_bytes: 2 << 30,
            recommend_threaded: true,
            recommended_initial_reservation_bytes: 256 << 20,
            recommended_threads: 8,
        }
    }

    fn png(index: usize, size: u32) -> SourceImage {
        SourceImage::new(png_header(size, size), format!("layer_{}.png", index), "png")
    }

    fn session(encoder: MockEncoder, profile: MemoryProfile) -> EncodeSession<MockEncoder> {
        EncodeSession::new(
            encoder,
            EncodeSettings::texture_array(),
            CapacityConfig::texture_array(),
            profile,
        )
        .unwrap()
    }

    #[test]
    fn test_encode_array_truncates_output() {
        let session = session(MockEncoder::writing(1234), threaded_profile());
        let sources: Vec<_> = (0..4).map(|i| png(i, 256)).collect();

        let encoded = session.encode_array(&sources).unwrap();

        assert_eq!(encoded.data.len(), 1234);
        assert!(encoded.data.iter().all(|b| *b == 0xAB));
        assert_eq!(encoded.layers, 4);
        assert_eq!(encoded.capacity.source, DimensionSource::Header);
        assert_eq!(encoded.capacity.layers, 4);
    }

    #[test]
    fn test_buffer_sized_from_first_header() {
        let session = session(MockEncoder::writing(10), MemoryProfile::conservative());
        let sources: Vec<_> = (0..32).map(|i| png(i, 1024)).collect();

        session.encode_array(&sources).unwrap();

        let seen = session.encoder.seen.lock().unwrap();
        // 1024² × 1.6 × 32 layers exceeds the 32 MiB ceiling
        assert_eq!(seen[0].4, 32 * 1024 * 1024);
    }

    #[test]
    fn test_zero_bytes_is_capacity_underestimate() {
        let session = session(MockEncoder::writing(0), MemoryProfile::conservative());
        let sources = vec![png(0, 64), png(1, 64)];

        let err = session.encode_array(&sources).unwrap_err();
        assert_eq!(
            err,
            EncodeError::CapacityUnderestimate {
                capacity: DEFAULT_MIN_SIZE,
                layers: 2
            }
        );
        // Not retried
        assert_eq!(session.encoder.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_overreported_bytes_rejected() {
        let session = session(MockEncoder::writing(usize::MAX), MemoryProfile::conservative());
        let err = session.encode_image(&png(0, 64)).unwrap_err();
        assert!(matches!(err, EncodeError::Encoder(_)));
    }

    #[test]
    fn test_threading_requires_settings_and_profile() {
        let both = session(MockEncoder::writing(1), threaded_profile());
        both.encode_image(&png(0, 64)).unwrap();
        let seen = both.encoder.seen.lock().unwrap();
        assert!(seen[0].2);
        assert_eq!(seen[0].3, 8);
        drop(seen);

        let profile_only = session(MockEncoder::writing(1), MemoryProfile::conservative());
        profile_only.encode_image(&png(0, 64)).unwrap();
        let seen = profile_only.encoder.seen.lock().unwrap();
        assert!(!seen[0].2);
        assert_eq!(seen[0].3, 1);
        drop(seen);

        let settings_off = EncodeSession::new(
            MockEncoder::writing(1),
            EncodeSettings::texture_array().with_multithreading(false),
            CapacityConfig::texture_array(),
            threaded_profile(),
        )
        .unwrap();
        assert!(!settings_off.threaded());
        let encoded = settings_off.encode_image(&png(0, 64)).unwrap();
        assert!(!encoded.threaded);
    }

    #[test]
    fn test_layer_count_saturates() {
        assert_eq!(layer_count(4), 4);
        assert_eq!(layer_count(u32::MAX as usize), u32::MAX);
        assert_eq!(layer_count(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_empty_sources_rejected() {
        let session = session(MockEncoder::writing(1), MemoryProfile::conservative());
        assert_eq!(session.encode_array(&[]).unwrap_err(), EncodeError::NoSources);
        assert!(session.encoder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_source_rejected_before_encode() {
        let session = session(MockEncoder::writing(1), MemoryProfile::conservative());
        let sources = vec![
            png(0, 64),
            SourceImage::new(Vec::new(), "missing.png", "png"),
        ];

        assert_eq!(
            session.encode_array(&sources).unwrap_err(),
            EncodeError::MissingData { index: 1 }
        );
        assert!(session.encoder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_encoder_error_propagates() {
        let session = EncodeSession::new(
            FailingEncoder,
            EncodeSettings::single_image(),
            CapacityConfig::single_image(),
            MemoryProfile::conservative(),
        )
        .unwrap();
        assert!(matches!(
            session.encode_image(&png(0, 64)),
            Err(EncodeError::Encoder(_))
        ));
    }

    #[test]
    fn test_image_type_passed_through() {
        let session = session(MockEncoder::writing(1), MemoryProfile::conservative());
        session.encode_image(&png(0, 64)).unwrap();
        session.encode_array(&[png(0, 64)]).unwrap();

        let seen = session.encoder.seen.lock().unwrap();
        assert_eq!(seen[0].1, TextureType::Image2D);
        assert_eq!(seen[1].1, TextureType::Array2D);
    }

    #[test]
    fn test_invalid_capacity_config() {
        let result = EncodeSession::new(
            MockEncoder::writing(1),
            EncodeSettings::default(),
            CapacityConfig::default().with_bounds(10, 1),
            MemoryProfile::conservative(),
        );
        assert!(matches!(result, Err(EncodeError::Capacity(_))));
    }
}
