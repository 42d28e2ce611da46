//! Memory-constraint policy engine.
//!
//! Turns [`PlatformSignals`] and a shared-memory probe into a
//! [`MemoryProfile`]: how much memory the encoder can count on, whether to
//! load the threaded build, and how large an initial linear-memory
//! reservation to request.
//!
//! ```text
//! estimated available
//!   private browsing ──────────────► 256 MiB
//!   device memory hint ≤1/≤2/≤4/>4 ─► 256 MiB / 512 MiB / 1 GiB / 2 GiB
//!   heap limit − used ─────────────► capped at 4 GiB
//!   nothing ───────────────────────► 1 GiB desktop, 512 MiB mobile
//!   then capped at the largest block a prior allocation search obtained
//!
//! initial reservation (one band lower on iOS/Android)
//!   ≥2 GiB → 256 MiB, ≥1 GiB → 128 MiB, ≥512 MiB → 64 MiB, else 32 MiB
//! ```

use serde::{Deserialize, Serialize};

use super::probe::SharedMemoryProbe;
use super::signals::PlatformSignals;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// Default available-memory floor for private browsing contexts.
pub const DEFAULT_PRIVATE_FLOOR: u64 = 256 * MIB;

/// Default threshold above which the threaded build is recommended.
pub const DEFAULT_THREADING_THRESHOLD: u64 = 512 * MIB;

/// Upper cap on heap-introspection estimates.
pub const HEAP_ESTIMATE_CAP: u64 = 4 * GIB;

/// Estimate when no signal is available on desktop.
pub const DESKTOP_DEFAULT_AVAILABLE: u64 = GIB;

/// Estimate when no signal is available on mobile.
pub const MOBILE_DEFAULT_AVAILABLE: u64 = 512 * MIB;

/// Maximum encoder worker threads.
pub const MAX_ENCODER_THREADS: usize = 18;

/// Worker threads assumed when the CPU count is unknown.
pub const FALLBACK_THREADS: usize = 4;

/// Device-memory hint bands: (hint upper bound in GiB, estimated bytes).
const DEVICE_MEMORY_BANDS: &[(f64, u64)] = &[(1.0, 256 * MIB), (2.0, 512 * MIB), (4.0, GIB)];

/// Estimate for hints above the last band.
const DEVICE_MEMORY_TOP_BAND: u64 = 2 * GIB;

/// Reservation table: (minimum available bytes, reservation bytes),
/// largest first.
const RESERVATION_TABLE: &[(u64, u64)] = &[
    (2 * GIB, 256 * MIB),
    (GIB, 128 * MIB),
    (512 * MIB, 64 * MIB),
    (0, 32 * MIB),
];

/// Tunable thresholds of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPolicyConfig {
    /// Available memory must exceed this for threaded execution.
    pub threading_threshold: u64,
    /// Estimate used for private browsing contexts.
    pub private_floor: u64,
}

impl Default for MemoryPolicyConfig {
    fn default() -> Self {
        Self {
            threading_threshold: DEFAULT_THREADING_THRESHOLD,
            private_floor: DEFAULT_PRIVATE_FLOOR,
        }
    }
}

/// Recommendations for one encoding session.
///
/// Computed fresh on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryProfile {
    /// Heuristic estimate of memory available to the encoder.
    pub estimated_available_bytes: u64,
    /// Whether to run the encoder's threaded build.
    pub recommend_threaded: bool,
    /// Initial linear-memory reservation for the encoder module.
    pub recommended_initial_reservation_bytes: u64,
    /// Worker threads to request when threaded.
    pub recommended_threads: usize,
}

impl MemoryProfile {
    /// The most conservative profile: single-threaded, smallest reservation.
    pub fn conservative() -> Self {
        Self {
            estimated_available_bytes: DEFAULT_PRIVATE_FLOOR,
            recommend_threaded: false,
            recommended_initial_reservation_bytes: RESERVATION_TABLE[RESERVATION_TABLE.len() - 1].1,
            recommended_threads: 1,
        }
    }
}

/// Derives [`MemoryProfile`]s from platform signals.
///
/// # Example
///
/// ```
/// use ktxarray::memory::{MemoryPolicy, PlatformSignals, StaticProbe};
///
/// let policy = MemoryPolicy::default();
/// let signals = PlatformSignals::default().with_device_memory_gib(8.0);
///
/// let profile = policy.evaluate(&signals, &StaticProbe(true));
/// assert!(profile.recommend_threaded);
///
/// let profile = policy.evaluate(&signals, &StaticProbe(false));
/// assert!(!profile.recommend_threaded);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryPolicy {
    config: MemoryPolicyConfig,
}

impl MemoryPolicy {
    /// Create a policy with custom thresholds.
    pub fn new(config: MemoryPolicyConfig) -> Self {
        Self { config }
    }

    /// The active thresholds.
    pub fn config(&self) -> &MemoryPolicyConfig {
        &self.config
    }

    /// Evaluate the policy.
    ///
    /// The only side effect is running `probe`. A probe error degrades the
    /// recommendation to single-threaded; it is never returned.
    pub fn evaluate(&self, signals: &PlatformSignals, probe: &dyn SharedMemoryProbe) -> MemoryProfile {
        let available = self.estimate_available(signals);

        let shared_memory = match probe.probe() {
            Ok(()) => true,
            Err(e) => {
                tracing::info!(error = %e, "Shared memory unsupported, using single-threaded encoder");
                false
            }
        };

        let recommend_threaded = shared_memory
            && !signals.shared_memory_unreliable()
            && !signals.private_browsing
            && available > self.config.threading_threshold;

        let reservation = reservation_for(available, signals.oom_prone());
        let threads = if recommend_threaded {
            signals
                .hardware_concurrency
                .unwrap_or(FALLBACK_THREADS)
                .clamp(1, MAX_ENCODER_THREADS)
        } else {
            1
        };

        let profile = MemoryProfile {
            estimated_available_bytes: available,
            recommend_threaded,
            recommended_initial_reservation_bytes: reservation,
            recommended_threads: threads,
        };

        tracing::debug!(
            available_mb = available / MIB,
            threaded = recommend_threaded,
            reservation_mb = reservation / MIB,
            threads,
            "Evaluated memory profile"
        );

        profile
    }

    /// Tiered estimate of memory available to the encoder, capped by any
    /// recorded allocation search result.
    pub fn estimate_available(&self, signals: &PlatformSignals) -> u64 {
        let tier = self.tier_estimate(signals);
        match signals.largest_allocation {
            Some(largest) if largest < tier => {
                tracing::debug!(
                    tier_mb = tier / MIB,
                    largest_allocation_mb = largest / MIB,
                    "Allocation search result caps memory estimate"
                );
                largest
            }
            _ => tier,
        }
    }

    fn tier_estimate(&self, signals: &PlatformSignals) -> u64 {
        if signals.private_browsing {
            return self.config.private_floor;
        }

        if let Some(gib) = signals.device_memory_gib.filter(|g| g.is_finite() && *g > 0.0) {
            return DEVICE_MEMORY_BANDS
                .iter()
                .find(|(limit, _)| gib <= *limit)
                .map(|(_, bytes)| *bytes)
                .unwrap_or(DEVICE_MEMORY_TOP_BAND);
        }

        if let Some(heap) = signals.heap.filter(|h| h.limit_bytes > 0) {
            return heap.headroom().min(HEAP_ESTIMATE_CAP);
        }

        if signals.is_mobile || signals.oom_prone() {
            MOBILE_DEFAULT_AVAILABLE
        } else {
            DESKTOP_DEFAULT_AVAILABLE
        }
    }
}

/// Pick an initial reservation from the table, one band lower when the
/// platform is prone to out-of-memory aborts.
fn reservation_for(available: u64, oom_prone: bool) -> u64 {
    let index = RESERVATION_TABLE
        .iter()
        .position(|(min_available, _)| available >= *min_available)
        .unwrap_or(RESERVATION_TABLE.len() - 1);

    let index = if oom_prone {
        (index + 1).min(RESERVATION_TABLE.len() - 1)
    } else {
        index
    };

    RESERVATION_TABLE[index].1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::probe::{StaticProbe, ThreadingDiagnostics};
    use crate::memory::signals::HeapStats;

    fn desktop(gib: f64) -> PlatformSignals {
        PlatformSignals::default().with_device_memory_gib(gib)
    }

    #[test]
    fn test_device_memory_bands() {
        let policy = MemoryPolicy::default();
        assert_eq!(policy.estimate_available(&desktop(0.5)), 256 * MIB);
        assert_eq!(policy.estimate_available(&desktop(1.0)), 256 * MIB);
        assert_eq!(policy.estimate_available(&desktop(2.0)), 512 * MIB);
        assert_eq!(policy.estimate_available(&desktop(4.0)), GIB);
        assert_eq!(policy.estimate_available(&desktop(8.0)), 2 * GIB);
    }

    #[test]
    fn test_private_browsing_floor_wins() {
        let signals = PlatformSignals {
            private_browsing: true,
            ..desktop(8.0)
        };
        assert_eq!(MemoryPolicy::default().estimate_available(&signals), 256 * MIB);
    }

    #[test]
    fn test_heap_fallback() {
        let signals = PlatformSignals::default().with_heap(HeapStats {
            used_bytes: 100 * MIB,
            total_bytes: 200 * MIB,
            limit_bytes: 2 * GIB,
        });
        assert_eq!(
            MemoryPolicy::default().estimate_available(&signals),
            2 * GIB - 100 * MIB
        );
    }

    #[test]
    fn test_heap_fallback_capped() {
        let signals = PlatformSignals::default().with_heap(HeapStats {
            used_bytes: 0,
            total_bytes: 0,
            limit_bytes: 16 * GIB,
        });
        assert_eq!(MemoryPolicy::default().estimate_available(&signals), 4 * GIB);
    }

    #[test]
    fn test_no_signals_defaults() {
        let policy = MemoryPolicy::default();
        assert_eq!(policy.estimate_available(&PlatformSignals::default()), GIB);

        let mobile = PlatformSignals {
            is_mobile: true,
            ..Default::default()
        };
        assert_eq!(policy.estimate_available(&mobile), 512 * MIB);
    }

    #[test]
    fn test_invalid_device_memory_ignored() {
        let policy = MemoryPolicy::default();
        assert_eq!(policy.estimate_available(&desktop(f64::NAN)), GIB);
        assert_eq!(policy.estimate_available(&desktop(-1.0)), GIB);
    }

    #[test]
    fn test_allocation_result_caps_estimate() {
        let policy = MemoryPolicy::default();
        let signals = PlatformSignals {
            hardware_concurrency: Some(8),
            ..desktop(8.0)
        };

        let unrestricted = policy.evaluate(&signals, &StaticProbe(true));
        assert!(unrestricted.recommend_threaded);
        assert_eq!(unrestricted.recommended_initial_reservation_bytes, 256 * MIB);

        let constrained = signals.with_largest_allocation(300 * MIB);
        assert_eq!(policy.estimate_available(&constrained), 300 * MIB);

        let profile = policy.evaluate(&constrained, &StaticProbe(true));
        assert!(!profile.recommend_threaded);
        assert_eq!(profile.recommended_threads, 1);
        assert_eq!(profile.recommended_initial_reservation_bytes, 32 * MIB);
    }

    #[test]
    fn test_allocation_result_never_raises_estimate() {
        let signals = desktop(2.0).with_largest_allocation(4 * GIB);
        assert_eq!(MemoryPolicy::default().estimate_available(&signals), 512 * MIB);

        let private = PlatformSignals {
            private_browsing: true,
            ..desktop(8.0)
        }
        .with_largest_allocation(2 * GIB);
        assert_eq!(MemoryPolicy::default().estimate_available(&private), 256 * MIB);
    }

    #[test]
    fn test_threaded_on_capable_desktop() {
        let signals = PlatformSignals {
            hardware_concurrency: Some(32),
            ..desktop(8.0)
        };
        let profile = MemoryPolicy::default().evaluate(&signals, &ThreadingDiagnostics::all_supported());

        assert!(profile.recommend_threaded);
        assert_eq!(profile.recommended_threads, MAX_ENCODER_THREADS);
        assert_eq!(profile.recommended_initial_reservation_bytes, 256 * MIB);
    }

    #[test]
    fn test_probe_failure_forces_single_threaded() {
        let signals = PlatformSignals {
            hardware_concurrency: Some(8),
            ..desktop(8.0)
        };
        let profile = MemoryPolicy::default().evaluate(&signals, &StaticProbe(false));

        assert!(!profile.recommend_threaded);
        assert_eq!(profile.recommended_threads, 1);
    }

    #[test]
    fn test_each_condition_blocks_threading() {
        let policy = MemoryPolicy::default();
        let probe = StaticProbe(true);

        let ios = PlatformSignals {
            is_ios: true,
            ..desktop(8.0)
        };
        assert!(!policy.evaluate(&ios, &probe).recommend_threaded);

        let private = PlatformSignals {
            private_browsing: true,
            ..desktop(8.0)
        };
        assert!(!policy.evaluate(&private, &probe).recommend_threaded);

        // 2 GiB hint maps to exactly 512 MiB, which does not exceed the threshold
        assert!(!policy.evaluate(&desktop(2.0), &probe).recommend_threaded);
        assert!(policy.evaluate(&desktop(4.0), &probe).recommend_threaded);
    }

    #[test]
    fn test_reservation_table() {
        assert_eq!(reservation_for(4 * GIB, false), 256 * MIB);
        assert_eq!(reservation_for(GIB, false), 128 * MIB);
        assert_eq!(reservation_for(600 * MIB, false), 64 * MIB);
        assert_eq!(reservation_for(100 * MIB, false), 32 * MIB);
    }

    #[test]
    fn test_reservation_steps_down_on_oom_prone() {
        assert_eq!(reservation_for(4 * GIB, true), 128 * MIB);
        assert_eq!(reservation_for(GIB, true), 64 * MIB);
        assert_eq!(reservation_for(100 * MIB, true), 32 * MIB);
    }

    #[test]
    fn test_android_profile() {
        let signals = PlatformSignals {
            is_android: true,
            is_mobile: true,
            hardware_concurrency: Some(8),
            ..desktop(4.0)
        };
        let profile = MemoryPolicy::default().evaluate(&signals, &StaticProbe(true));

        assert!(profile.recommend_threaded);
        assert_eq!(profile.recommended_threads, 8);
        assert_eq!(profile.recommended_initial_reservation_bytes, 64 * MIB);
    }

    #[test]
    fn test_custom_threshold() {
        let policy = MemoryPolicy::new(MemoryPolicyConfig {
            threading_threshold: 4 * GIB,
            ..Default::default()
        });
        assert!(!policy.evaluate(&desktop(8.0), &StaticProbe(true)).recommend_threaded);
    }

    #[test]
    fn test_conservative_profile() {
        let profile = MemoryProfile::conservative();
        assert!(!profile.recommend_threaded);
        assert_eq!(profile.recommended_initial_reservation_bytes, 32 * MIB);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_probe_failure_dominates(
                gib in proptest::option::of(0.25f64..64.0),
                is_mobile in any::<bool>(),
                is_ios in any::<bool>(),
                is_android in any::<bool>(),
                is_safari in any::<bool>(),
                private_browsing in any::<bool>(),
                cores in proptest::option::of(1usize..128)
            ) {
                let signals = PlatformSignals {
                    device_memory_gib: gib,
                    is_mobile,
                    is_ios,
                    is_android,
                    is_safari,
                    private_browsing,
                    heap: None,
                    hardware_concurrency: cores,
                    largest_allocation: None,
                };

                let profile = MemoryPolicy::default().evaluate(&signals, &StaticProbe(false));
                prop_assert!(!profile.recommend_threaded);
            }
        }
    }
}
