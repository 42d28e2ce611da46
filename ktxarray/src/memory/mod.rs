//! Memory-constraint policy for the WASM encoder.
//!
//! WASM linear memory is hard-capped and growing it can abort the page on
//! mobile browsers, so the encoder must be configured conservatively before
//! it is instantiated. This module turns coarse platform signals into a
//! [`MemoryProfile`]:
//!
//! ```text
//! PlatformSignals ──┐
//!                   ├──► MemoryPolicy::evaluate ──► MemoryProfile
//! SharedMemoryProbe ┘                                ├─ estimated_available_bytes
//!                                                    ├─ recommend_threaded
//!                                                    ├─ recommended_initial_reservation_bytes
//!                                                    └─ recommended_threads
//! ```
//!
//! Failures here never abort anything; they only make the recommendation
//! more conservative. [`AllocationProbe`] is a separate opt-in diagnostic
//! that measures the allocator empirically.

mod diagnostic;
mod policy;
mod probe;
mod signals;

pub use diagnostic::{
    AllocationProbe, ProbeAllocator, ProbeReport, SystemAllocator, DEFAULT_PROBE_DELAY,
    DEFAULT_PROBE_GRANULARITY, DEFAULT_PROBE_MAX, DEFAULT_PROBE_MIN,
};
pub use policy::{
    MemoryPolicy, MemoryPolicyConfig, MemoryProfile, DEFAULT_PRIVATE_FLOOR,
    DEFAULT_THREADING_THRESHOLD, MAX_ENCODER_THREADS,
};
pub use probe::{EnvironmentProbeError, SharedMemoryProbe, StaticProbe, ThreadingDiagnostics};
pub use signals::{HeapStats, PlatformSignals};
