//! Runtime platform signals fed to the memory policy.

use serde::{Deserialize, Serialize};

use super::diagnostic::ProbeReport;

/// JS heap statistics (`performance.memory` in Chromium browsers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeapStats {
    /// Bytes currently in use.
    pub used_bytes: u64,
    /// Bytes currently committed.
    pub total_bytes: u64,
    /// Maximum heap size the engine will grow to.
    pub limit_bytes: u64,
}

impl HeapStats {
    /// Headroom between usage and the limit.
    pub fn headroom(&self) -> u64 {
        self.limit_bytes.saturating_sub(self.used_bytes)
    }
}

/// Everything the policy knows about the host.
///
/// The glue layer collects these from the browser (`navigator.deviceMemory`,
/// user agent, storage quota heuristics) and passes them in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSignals {
    /// Reported device memory in GiB (coarse, e.g. 0.5, 1, 2, 4, 8).
    pub device_memory_gib: Option<f64>,
    /// Mobile form factor.
    pub is_mobile: bool,
    /// iOS / iPadOS.
    pub is_ios: bool,
    /// Android.
    pub is_android: bool,
    /// Safari engine.
    pub is_safari: bool,
    /// Private / incognito browsing context.
    pub private_browsing: bool,
    /// JS heap statistics, when the engine exposes them.
    pub heap: Option<HeapStats>,
    /// Logical CPU count.
    pub hardware_concurrency: Option<usize>,
    /// Largest block an earlier allocation search obtained, in bytes.
    pub largest_allocation: Option<u64>,
}

impl PlatformSignals {
    /// Signals describing the current native process.
    ///
    /// Only the CPU count is observable; every browser-specific flag is off.
    pub fn native() -> Self {
        Self {
            hardware_concurrency: std::thread::available_parallelism()
                .map(|p| p.get())
                .ok(),
            ..Self::default()
        }
    }

    /// Platforms where shared-memory WASM threading has a history of
    /// breaking even when feature detection passes.
    pub fn shared_memory_unreliable(&self) -> bool {
        self.is_ios || (self.is_safari && self.is_mobile)
    }

    /// Platforms prone to aborting on large linear-memory reservations.
    pub fn oom_prone(&self) -> bool {
        self.is_ios || self.is_android
    }

    /// Set the device memory hint.
    pub fn with_device_memory_gib(mut self, gib: f64) -> Self {
        self.device_memory_gib = Some(gib);
        self
    }

    /// Set the heap statistics.
    pub fn with_heap(mut self, heap: HeapStats) -> Self {
        self.heap = Some(heap);
        self
    }

    /// Set the largest block a previous allocation search obtained.
    pub fn with_largest_allocation(mut self, bytes: u64) -> Self {
        self.largest_allocation = Some(bytes);
        self
    }

    /// Record the outcome of an [`AllocationProbe`](super::AllocationProbe) run.
    ///
    /// A run where every attempt failed counts as a zero-byte result. A run
    /// that made no attempts leaves the signals unchanged.
    pub fn with_probe_report(self, report: &ProbeReport) -> Self {
        match (report.largest_success, report.smallest_failure) {
            (Some(bytes), _) => self.with_largest_allocation(bytes as u64),
            (None, Some(_)) => self.with_largest_allocation(0),
            (None, None) => self,
        }
    }
}
