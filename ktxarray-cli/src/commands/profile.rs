//! `profile` command: evaluate the memory policy for a described platform.

use clap::Args;
use console::style;
use ktxarray::config::format_size;
use ktxarray::memory::{HeapStats, MemoryPolicy, PlatformSignals, StaticProbe};

use super::common::{load_config, print_field, print_json};
use crate::error::CliError;

const MIB: u64 = 1024 * 1024;

/// Arguments for `ktxarray profile`.
///
/// Without flags the current machine is described: CPU count only, shared
/// memory available.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Reported device memory in GiB (navigator.deviceMemory)
    #[arg(long)]
    pub device_memory: Option<f64>,

    /// Mobile form factor
    #[arg(long)]
    pub mobile: bool,

    /// iOS / iPadOS
    #[arg(long)]
    pub ios: bool,

    /// Android
    #[arg(long)]
    pub android: bool,

    /// Safari engine
    #[arg(long)]
    pub safari: bool,

    /// Private browsing context
    #[arg(long)]
    pub private: bool,

    /// JS heap in use, MiB (requires --heap-limit-mb)
    #[arg(long, requires = "heap_limit_mb")]
    pub heap_used_mb: Option<u64>,

    /// JS heap size limit, MiB
    #[arg(long)]
    pub heap_limit_mb: Option<u64>,

    /// Logical CPU count (defaults to this machine's)
    #[arg(long)]
    pub cores: Option<usize>,

    /// Largest block a previous `ktxarray probe` obtained, MiB
    #[arg(long)]
    pub largest_allocation_mb: Option<u64>,

    /// Treat shared WASM memory as unavailable
    #[arg(long)]
    pub no_shared_memory: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ProfileArgs {
    fn signals(&self) -> PlatformSignals {
        let native = PlatformSignals::native();
        PlatformSignals {
            device_memory_gib: self.device_memory,
            is_mobile: self.mobile,
            is_ios: self.ios,
            is_android: self.android,
            is_safari: self.safari,
            private_browsing: self.private,
            heap: self.heap_limit_mb.map(|limit| HeapStats {
                used_bytes: self.heap_used_mb.unwrap_or(0) * MIB,
                total_bytes: self.heap_used_mb.unwrap_or(0) * MIB,
                limit_bytes: limit * MIB,
            }),
            hardware_concurrency: self.cores.or(native.hardware_concurrency),
            largest_allocation: self.largest_allocation_mb.map(|mb| mb * MIB),
        }
    }
}

/// Run the profile command.
pub fn run(args: ProfileArgs) -> Result<(), CliError> {
    let policy = MemoryPolicy::new(load_config().memory);
    let signals = args.signals();
    let profile = policy.evaluate(&signals, &StaticProbe(!args.no_shared_memory));

    if args.json {
        return print_json(&profile);
    }

    let mode = if profile.recommend_threaded {
        style("threaded").green()
    } else {
        style("single-threaded").yellow()
    };

    println!("Memory profile");
    print_field(
        "Estimated available",
        format_size(profile.estimated_available_bytes as usize),
    );
    print_field("Encoder", mode);
    print_field("Threads", profile.recommended_threads);
    print_field(
        "Initial reservation",
        format_size(profile.recommended_initial_reservation_bytes as usize),
    );
    Ok(())
}
