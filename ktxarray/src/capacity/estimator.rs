//! Destination buffer sizing for the encoder.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::config::{
    CapacityConfig, SizingModel, APPROX_BYTES_PER_PIXEL, BLOCK_BYTES, BLOCK_DIM,
    MIP_CHAIN_MULTIPLIER,
};
use super::decoded::probe_dimensions_async;
use super::error::CapacityError;
use super::sniff::sniff_png_dimensions;
use crate::texture::mip_dimension;

/// Where the sizing dimension came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSource {
    /// Read from the container header.
    Header,
    /// Reported by the image decoder.
    Decoded,
    /// Supplied by the caller.
    Caller,
    /// Unknown; the configured fallback was used.
    Fallback,
}

/// Byte count to allocate before invoking the encoder.
///
/// This is a ceiling for allocation, not a prediction of the exact output
/// size. The encoder may still run out of room, which it reports as zero
/// output bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityEstimate {
    /// Bytes to allocate.
    pub bytes: usize,
    /// Square dimension the formula was evaluated for.
    pub dimension: u32,
    /// Layer count the formula was evaluated for (at least 1).
    pub layers: u32,
    /// Per-layer cost model.
    pub model: SizingModel,
    /// Origin of `dimension`.
    pub source: DimensionSource,
    /// Whether the raw figure fell outside the clamp band.
    pub clamped: bool,
}

impl CapacityEstimate {
    /// Bytes to allocate.
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

/// Sizes encoder destination buffers.
///
/// Two strategies share one formula:
///
/// - [`estimate_from_header`](Self::estimate_from_header): synchronous PNG
///   header sniffing
/// - [`estimate_from_decoded`](Self::estimate_from_decoded): asynchronous,
///   format-agnostic decoder probe
///
/// # Example
///
/// ```
/// use ktxarray::capacity::{CapacityConfig, CapacityEstimator, SizingModel};
///
/// let estimator = CapacityEstimator::new(
///     CapacityConfig::texture_array()
///         .with_model(SizingModel::BlockAccurate)
///         .with_mipmaps(true),
/// )
/// .unwrap();
///
/// let one = estimator.estimate_for_dimensions(1024, 1024, 1);
/// let four = estimator.estimate_for_dimensions(1024, 1024, 4);
/// assert!(four.bytes() > one.bytes());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapacityEstimator {
    config: CapacityConfig,
}

impl CapacityEstimator {
    /// Create an estimator, rejecting unusable parameters.
    pub fn new(config: CapacityConfig) -> Result<Self, CapacityError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active parameters.
    pub fn config(&self) -> &CapacityConfig {
        &self.config
    }

    /// Header-sniffing strategy.
    ///
    /// Reads PNG dimensions from the IHDR chunk of the representative image.
    /// Unrecognised or truncated data falls back to the configured square.
    pub fn estimate_from_header(&self, first_image: &[u8], layers: u32) -> CapacityEstimate {
        match sniff_png_dimensions(first_image) {
            Some((width, height)) => {
                self.estimate_with_source(width, height, layers, DimensionSource::Header)
            }
            None => {
                tracing::debug!(
                    bytes = first_image.len(),
                    "Image header not recognised, using fallback dimension"
                );
                self.estimate_with_source(0, 0, layers, DimensionSource::Fallback)
            }
        }
    }

    /// Decoded-metadata strategy.
    ///
    /// Probes the representative image with a full decoder on a blocking
    /// task. Slower than header sniffing but works for any format the
    /// `image` crate understands.
    pub async fn estimate_from_decoded(
        &self,
        first_image: Bytes,
        extension_hint: Option<&str>,
        layers: u32,
    ) -> CapacityEstimate {
        let hint = extension_hint.map(str::to_string);
        match probe_dimensions_async(first_image, hint).await {
            Some((width, height)) => {
                self.estimate_with_source(width, height, layers, DimensionSource::Decoded)
            }
            None => {
                tracing::warn!(
                    extension = extension_hint.unwrap_or("unknown"),
                    "Could not decode image dimensions, using fallback dimension"
                );
                self.estimate_with_source(0, 0, layers, DimensionSource::Fallback)
            }
        }
    }

    /// Size a buffer for known dimensions.
    pub fn estimate_for_dimensions(&self, width: u32, height: u32, layers: u32) -> CapacityEstimate {
        self.estimate_with_source(width, height, layers, DimensionSource::Caller)
    }

    fn estimate_with_source(
        &self,
        width: u32,
        height: u32,
        layers: u32,
        source: DimensionSource,
    ) -> CapacityEstimate {
        // Upstream preprocessing produces square POT images; the smaller side
        // is the safe choice if that ever fails.
        let (dimension, source) = match width.min(height) {
            0 => (self.config.fallback_dimension, DimensionSource::Fallback),
            size => (size, source),
        };
        let layers = layers.max(1);

        let per_layer = self.per_layer_bytes(dimension);
        let raw = per_layer
            .saturating_mul(layers as usize)
            .saturating_add(self.config.header_allowance);
        let bytes = raw.clamp(self.config.min_size, self.config.max_size);

        tracing::debug!(
            dimension,
            layers,
            model = %self.config.model,
            raw,
            bytes,
            "Estimated encoder buffer capacity"
        );

        CapacityEstimate {
            bytes,
            dimension,
            layers,
            model: self.config.model,
            source,
            clamped: bytes != raw,
        }
    }

    fn per_layer_bytes(&self, dimension: u32) -> usize {
        match self.config.model {
            SizingModel::PixelApprox => {
                let pixels = dimension as f64 * dimension as f64;
                let mip = if self.config.mipmaps {
                    MIP_CHAIN_MULTIPLIER
                } else {
                    1.0
                };
                // f64 → usize saturates
                (pixels * APPROX_BYTES_PER_PIXEL * mip * self.config.safety_multiplier).ceil()
                    as usize
            }
            SizingModel::BlockAccurate => block_chain_bytes(dimension, self.config.mipmaps),
        }
    }
}

/// Exact compressed size of a square texture at 16 bytes per 4×4 block.
///
/// With `mipmaps` the sum runs down to the 1×1 level; otherwise only the
/// base level is counted.
pub fn block_chain_bytes(dimension: u32, mipmaps: bool) -> usize {
    let mut total: usize = 0;
    let mut level = 0;
    loop {
        let dim = mip_dimension(dimension, level);
        let blocks_per_side = dim.div_ceil(BLOCK_DIM) as usize;
        total = total.saturating_add(
            blocks_per_side
                .saturating_mul(blocks_per_side)
                .saturating_mul(BLOCK_BYTES),
        );
        if !mipmaps || dim == 1 {
            return total;
        }
        level += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::decoded::test_support::encoded_image;
    use crate::capacity::sniff::test_support::png_header;

    const MIB: usize = 1024 * 1024;

    fn block_estimator(mipmaps: bool) -> CapacityEstimator {
        CapacityEstimator::new(
            CapacityConfig::texture_array()
                .with_model(SizingModel::BlockAccurate)
                .with_mipmaps(mipmaps),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = CapacityConfig::default().with_bounds(2 * MIB, MIB);
        assert!(CapacityEstimator::new(config).is_err());
    }

    #[test]
    fn test_block_chain_bytes_single_level() {
        // 64×64 = 16×16 blocks × 16 bytes
        assert_eq!(block_chain_bytes(64, false), 4096);
        assert_eq!(block_chain_bytes(1, false), 16);
        assert_eq!(block_chain_bytes(6, false), 64);
    }

    #[test]
    fn test_block_chain_bytes_full_chain() {
        // 16: 4×4 blocks, 8: 2×2, 4: 1×1, 2: 1×1, 1: 1×1
        assert_eq!(block_chain_bytes(16, true), (16 + 4 + 1 + 1 + 1) * 16);
    }

    #[test]
    fn test_block_accurate_layers_scale() {
        // 1024×1024 with mips, four layers vs one
        let estimator = block_estimator(true);
        let one = estimator.estimate_for_dimensions(1024, 1024, 1);
        let four = estimator.estimate_for_dimensions(1024, 1024, 4);

        assert!(four.bytes() >= MIB && four.bytes() <= 32 * MIB);
        assert!(four.bytes() > one.bytes());
        assert_eq!(four.bytes(), block_chain_bytes(1024, true) * 4 + 4096);
        assert!(!four.clamped);
    }

    #[test]
    fn test_pixel_approx_formula() {
        let estimator = CapacityEstimator::new(CapacityConfig::texture_array()).unwrap();
        let estimate = estimator.estimate_for_dimensions(1024, 1024, 2);

        // 1024² × 1.0 × 1.6 × 2 layers + 4096
        let expected = (1024.0 * 1024.0 * 1.6_f64).ceil() as usize * 2 + 4096;
        assert_eq!(estimate.bytes(), expected);
        assert_eq!(estimate.source, DimensionSource::Caller);
    }

    #[test]
    fn test_pixel_approx_with_mipmaps() {
        let estimator = CapacityEstimator::new(CapacityConfig::single_image()).unwrap();
        let estimate = estimator.estimate_for_dimensions(1024, 1024, 1);

        let expected = (1024.0 * 1024.0 * 1.33 * 1.5_f64).ceil() as usize + 4096;
        assert_eq!(estimate.bytes(), expected);
    }

    #[test]
    fn test_uses_smaller_dimension() {
        let estimator = block_estimator(false);
        let wide = estimator.estimate_for_dimensions(2048, 512, 8);
        assert_eq!(wide.dimension, 512);
    }

    #[test]
    fn test_clamped_to_max() {
        let estimator = CapacityEstimator::default();
        let estimate = estimator.estimate_for_dimensions(8192, 8192, 16);
        assert_eq!(estimate.bytes(), 32 * MIB);
        assert!(estimate.clamped);
    }

    #[test]
    fn test_clamped_to_min() {
        let estimator = CapacityEstimator::default();
        let estimate = estimator.estimate_for_dimensions(1, 1, 1);
        assert_eq!(estimate.bytes(), MIB);
        assert!(estimate.clamped);
    }

    #[test]
    fn test_zero_layers_treated_as_one() {
        let estimator = block_estimator(false);
        assert_eq!(
            estimator.estimate_for_dimensions(1024, 1024, 0),
            estimator.estimate_for_dimensions(1024, 1024, 1)
        );
    }

    #[test]
    fn test_header_strategy_reads_png() {
        let estimator = CapacityEstimator::default();
        let estimate = estimator.estimate_from_header(&png_header(512, 512), 4);
        assert_eq!(estimate.dimension, 512);
        assert_eq!(estimate.source, DimensionSource::Header);
    }

    #[test]
    fn test_header_strategy_falls_back() {
        let estimator = CapacityEstimator::default();
        let estimate = estimator.estimate_from_header(b"GIF89a....", 2);
        assert_eq!(estimate.dimension, 1024);
        assert_eq!(estimate.source, DimensionSource::Fallback);
    }

    #[test]
    fn test_zero_dimension_header_falls_back() {
        let estimator = CapacityEstimator::default();
        let estimate = estimator.estimate_from_header(&png_header(0, 512), 1);
        assert_eq!(estimate.dimension, 1024);
        assert_eq!(estimate.source, DimensionSource::Fallback);
    }

    #[tokio::test]
    async fn test_decoded_strategy_jpeg() {
        let estimator = block_estimator(false);
        let data = Bytes::from(encoded_image(64, 128, image::ImageFormat::Jpeg));

        let estimate = estimator.estimate_from_decoded(data, Some("jpeg"), 3).await;
        assert_eq!(estimate.dimension, 64);
        assert_eq!(estimate.source, DimensionSource::Decoded);
        assert_eq!(estimate.layers, 3);
    }

    #[tokio::test]
    async fn test_decoded_strategy_matches_header_for_png() {
        let estimator = CapacityEstimator::default();
        let data = encoded_image(256, 256, image::ImageFormat::Png);

        let header = estimator.estimate_from_header(&data, 5);
        let decoded = estimator
            .estimate_from_decoded(Bytes::from(data), None, 5)
            .await;
        assert_eq!(header.bytes(), decoded.bytes());
    }

    #[tokio::test]
    async fn test_decoded_strategy_falls_back() {
        let estimator = CapacityEstimator::default();
        let estimate = estimator
            .estimate_from_decoded(Bytes::from_static(b"garbage"), Some("png"), 1)
            .await;
        assert_eq!(estimate.source, DimensionSource::Fallback);
        assert!(estimate.bytes() >= MIB);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_monotonic_in_layers(
                dimension in 1u32..4096,
                layers in 1u32..64,
                block in any::<bool>(),
                mipmaps in any::<bool>()
            ) {
                let model = if block { SizingModel::BlockAccurate } else { SizingModel::PixelApprox };
                let estimator = CapacityEstimator::new(
                    CapacityConfig::texture_array().with_model(model).with_mipmaps(mipmaps),
                )?;

                let fewer = estimator.estimate_for_dimensions(dimension, dimension, layers);
                let more = estimator.estimate_for_dimensions(dimension, dimension, layers + 1);
                prop_assert!(more.bytes() >= fewer.bytes());
            }

            #[test]
            fn test_always_within_band(
                width in any::<u32>(),
                height in any::<u32>(),
                layers in any::<u32>(),
                block in any::<bool>()
            ) {
                let model = if block { SizingModel::BlockAccurate } else { SizingModel::PixelApprox };
                let config = CapacityConfig::texture_array().with_model(model).with_mipmaps(true);
                let (min, max) = (config.min_size, config.max_size);
                let estimator = CapacityEstimator::new(config)?;

                let estimate = estimator.estimate_for_dimensions(width, height, layers);
                prop_assert!(estimate.bytes() >= min && estimate.bytes() <= max);
            }

            #[test]
            fn test_header_bytes_always_within_band(data in proptest::collection::vec(any::<u8>(), 0..64)) {
                let estimator = CapacityEstimator::default();
                let estimate = estimator.estimate_from_header(&data, 1);
                prop_assert!(estimate.bytes() >= 1024 * 1024);
                prop_assert!(estimate.bytes() <= 32 * 1024 * 1024);
            }
        }
    }
}
