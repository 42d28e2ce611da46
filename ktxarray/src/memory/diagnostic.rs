//! Opt-in allocation probing.
//!
//! Binary-searches the largest block the allocator will hand out by
//! actually attempting allocations. Slow and side-effecting: never run on
//! the default encoding path, and the result is advisory only (allocator
//! overcommit and fragmentation make it a snapshot, not a guarantee).

use std::time::Duration;

use serde::{Deserialize, Serialize};

const MIB: usize = 1024 * 1024;

/// Default lower bound of the search range.
pub const DEFAULT_PROBE_MIN: usize = 16 * MIB;

/// Default upper bound of the search range.
pub const DEFAULT_PROBE_MAX: usize = 2048 * MIB;

/// Default resolution of the search.
pub const DEFAULT_PROBE_GRANULARITY: usize = 16 * MIB;

/// Default pause between attempts, letting the allocator settle.
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_millis(50);

/// Attempts a single allocation of a given size.
pub trait ProbeAllocator {
    /// Allocate and immediately release `bytes`. Returns whether it worked.
    fn try_allocate(&self, bytes: usize) -> bool;
}

/// Allocator backed by `Vec::try_reserve_exact`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl ProbeAllocator for SystemAllocator {
    fn try_allocate(&self, bytes: usize) -> bool {
        let mut buffer: Vec<u8> = Vec::new();
        buffer.try_reserve_exact(bytes).is_ok()
    }
}

/// Outcome of an allocation probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Largest size that succeeded, if any did.
    pub largest_success: Option<usize>,
    /// Smallest size that failed, if any did.
    pub smallest_failure: Option<usize>,
    /// Number of allocation attempts made.
    pub attempts: u32,
}

/// Iterative allocation search over `[min_bytes, max_bytes]`.
///
/// # Example
///
/// ```no_run
/// use ktxarray::memory::AllocationProbe;
///
/// # async fn run() {
/// let report = AllocationProbe::new().with_range(64 << 20, 512 << 20).run().await;
/// println!("{:?}", report.largest_success);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AllocationProbe<A = SystemAllocator> {
    min_bytes: usize,
    max_bytes: usize,
    granularity: usize,
    delay: Duration,
    allocator: A,
}

impl AllocationProbe<SystemAllocator> {
    /// Probe with default bounds and the system allocator.
    pub fn new() -> Self {
        Self::with_allocator(SystemAllocator)
    }
}

impl Default for AllocationProbe<SystemAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ProbeAllocator> AllocationProbe<A> {
    /// Probe with default bounds and a custom allocator.
    pub fn with_allocator(allocator: A) -> Self {
        Self {
            min_bytes: DEFAULT_PROBE_MIN,
            max_bytes: DEFAULT_PROBE_MAX,
            granularity: DEFAULT_PROBE_GRANULARITY,
            delay: DEFAULT_PROBE_DELAY,
            allocator,
        }
    }

    /// Set the search range. Bounds are reordered if given backwards.
    pub fn with_range(mut self, min_bytes: usize, max_bytes: usize) -> Self {
        self.min_bytes = min_bytes.min(max_bytes);
        self.max_bytes = min_bytes.max(max_bytes);
        self
    }

    /// Set the search resolution (at least one byte).
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        self.granularity = granularity.max(1);
        self
    }

    /// Set the pause between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run the search.
    ///
    /// Suspends only on the delay between attempts; dropping the future
    /// cancels the search.
    pub async fn run(&self) -> ProbeReport {
        let mut low = self.min_bytes;
        let mut high = self.max_bytes;
        let mut report = ProbeReport {
            largest_success: None,
            smallest_failure: None,
            attempts: 0,
        };

        tracing::info!(
            min_mb = low / MIB,
            max_mb = high / MIB,
            granularity_mb = self.granularity / MIB,
            "Starting allocation probe"
        );

        // Try the ceiling first; success ends the search early.
        let mut candidate = high;
        loop {
            if report.attempts > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            report.attempts += 1;
            let ok = self.allocator.try_allocate(candidate);
            tracing::debug!(bytes = candidate, ok, "Allocation attempt");

            if ok {
                report.largest_success = Some(candidate);
                low = candidate;
            } else {
                report.smallest_failure = Some(candidate);
                high = candidate;
            }

            if ok && candidate == self.max_bytes {
                break;
            }
            if !ok && candidate == self.min_bytes {
                break;
            }

            let gap = high - low;
            if gap <= self.granularity {
                // The floor itself is never bisected onto; test it explicitly.
                if report.largest_success.is_none() && candidate != self.min_bytes {
                    candidate = self.min_bytes;
                    continue;
                }
                break;
            }
            candidate = low + gap / 2;
        }

        tracing::info!(
            largest_success = ?report.largest_success,
            smallest_failure = ?report.smallest_failure,
            attempts = report.attempts,
            "Allocation probe finished"
        );

        report
    }
}
