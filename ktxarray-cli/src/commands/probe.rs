//! `probe` command: opt-in allocation probing.

use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ktxarray::config::format_size;
use ktxarray::memory::AllocationProbe;

use super::common::{print_field, print_json};
use crate::error::CliError;

const MIB: usize = 1024 * 1024;

/// Arguments for `ktxarray probe`.
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Smallest allocation to try, MiB
    #[arg(long, default_value_t = 16)]
    pub min_mb: usize,

    /// Largest allocation to try, MiB
    #[arg(long, default_value_t = 2048)]
    pub max_mb: usize,

    /// Search resolution, MiB
    #[arg(long, default_value_t = 16)]
    pub granularity_mb: usize,

    /// Pause between attempts, milliseconds
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the probe command.
pub async fn run(args: ProbeArgs) -> Result<(), CliError> {
    let probe = AllocationProbe::new()
        .with_range(args.min_mb.saturating_mul(MIB), args.max_mb.saturating_mul(MIB))
        .with_granularity(args.granularity_mb.saturating_mul(MIB))
        .with_delay(Duration::from_millis(args.delay_ms));

    let spinner = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Probing allocations");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = probe.run().await;
    spinner.finish_and_clear();

    if args.json {
        return print_json(&report);
    }

    println!("Allocation probe (advisory)");
    print_field(
        "Largest success",
        report
            .largest_success
            .map(format_size)
            .unwrap_or_else(|| "none".to_string()),
    );
    print_field(
        "Smallest failure",
        report
            .smallest_failure
            .map(format_size)
            .unwrap_or_else(|| "none".to_string()),
    );
    print_field("Attempts", report.attempts);
    Ok(())
}
