//! `estimate` command: size the encoder buffer for a source image.

use std::path::PathBuf;

use clap::Args;
use ktxarray::capacity::{CapacityConfig, CapacityEstimator, DimensionSource};
use ktxarray::config::format_size;

use super::common::{load_config, print_field, print_json, read_file, ModelArg};
use crate::error::CliError;

/// Arguments for `ktxarray estimate`.
#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Representative source image (first layer)
    pub image: PathBuf,

    /// Number of layers that will be encoded
    #[arg(long, default_value_t = 1)]
    pub layers: u32,

    /// Per-layer sizing model (defaults to the configured model)
    #[arg(long, value_enum)]
    pub model: Option<ModelArg>,

    /// Decode the image instead of sniffing the PNG header
    #[arg(long)]
    pub decoded: bool,

    /// Use single-image parameters (mips, 16 MB ceiling) instead of the
    /// configured texture-array parameters
    #[arg(long)]
    pub single: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the estimate command.
pub async fn run(args: EstimateArgs) -> Result<(), CliError> {
    let mut config = if args.single {
        CapacityConfig::single_image()
    } else {
        load_config().capacity
    };
    if let Some(model) = args.model {
        config = config.with_model(model.into());
    }

    let estimator = CapacityEstimator::new(config)?;
    let data = read_file(&args.image)?;

    let estimate = if args.decoded {
        let hint = args
            .image
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        estimator
            .estimate_from_decoded(data.into(), hint.as_deref(), args.layers)
            .await
    } else {
        estimator.estimate_from_header(&data, args.layers)
    };

    if args.json {
        return print_json(&estimate);
    }

    let source = match estimate.source {
        DimensionSource::Header => "PNG header",
        DimensionSource::Decoded => "decoder",
        DimensionSource::Caller => "caller",
        DimensionSource::Fallback => "fallback (size unknown)",
    };

    println!("Buffer estimate for {}", args.image.display());
    print_field("Dimension", format!("{} ({})", estimate.dimension, source));
    print_field("Layers", estimate.layers);
    print_field("Model", estimate.model);
    print_field(
        "Buffer",
        format!("{} ({} bytes)", format_size(estimate.bytes), estimate.bytes),
    );
    if estimate.clamped {
        print_field(
            "Clamped",
            format!(
                "to [{}, {}]",
                format_size(estimator.config().min_size),
                format_size(estimator.config().max_size)
            ),
        );
    }
    Ok(())
}
