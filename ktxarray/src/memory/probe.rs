//! Shared-memory capability probes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A capability probe failed.
///
/// Never propagated out of the policy: a failed probe means "unsupported".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentProbeError {
    /// The shared-memory primitive could not be constructed.
    #[error("Shared memory unavailable: {0}")]
    SharedMemoryUnavailable(String),

    /// The probe itself could not run.
    #[error("Probe failed: {0}")]
    ProbeFailed(String),
}

/// Detects whether parallel WASM execution is possible.
pub trait SharedMemoryProbe {
    /// Succeeds only if a shared linear memory can be created and used.
    fn probe(&self) -> Result<(), EnvironmentProbeError>;
}

/// Individual prerequisites of WASM threading.
///
/// Collected by the glue layer; mirrors what the browser exposes so a
/// failure can be logged with its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThreadingDiagnostics {
    /// `WebAssembly` global present.
    pub has_web_assembly: bool,
    /// `WebAssembly.Memory` constructor present.
    pub has_wasm_memory_ctor: bool,
    /// `SharedArrayBuffer` constructor present.
    pub has_shared_array_buffer_ctor: bool,
    /// Page served with COOP/COEP (`crossOriginIsolated`).
    pub cross_origin_isolated: bool,
    /// `new WebAssembly.Memory({ shared: true, .. })` succeeded.
    pub can_construct_shared_memory: bool,
    /// The shared memory's buffer is a `SharedArrayBuffer`.
    pub shared_memory_is_shared_buffer: bool,
}

impl ThreadingDiagnostics {
    /// Diagnostics of a host where every prerequisite holds.
    pub fn all_supported() -> Self {
        Self {
            has_web_assembly: true,
            has_wasm_memory_ctor: true,
            has_shared_array_buffer_ctor: true,
            cross_origin_isolated: true,
            can_construct_shared_memory: true,
            shared_memory_is_shared_buffer: true,
        }
    }

    /// Threading needs a shared memory whose buffer really is shared.
    pub fn is_supported(&self) -> bool {
        self.has_wasm_memory_ctor
            && self.can_construct_shared_memory
            && self.shared_memory_is_shared_buffer
    }
}

impl SharedMemoryProbe for ThreadingDiagnostics {
    fn probe(&self) -> Result<(), EnvironmentProbeError> {
        if self.is_supported() {
            return Ok(());
        }

        tracing::debug!(
            has_web_assembly = self.has_web_assembly,
            has_wasm_memory_ctor = self.has_wasm_memory_ctor,
            has_shared_array_buffer_ctor = self.has_shared_array_buffer_ctor,
            cross_origin_isolated = self.cross_origin_isolated,
            can_construct_shared_memory = self.can_construct_shared_memory,
            shared_memory_is_shared_buffer = self.shared_memory_is_shared_buffer,
            "WASM threading prerequisites not met"
        );

        let reason = if !self.has_wasm_memory_ctor {
            "WebAssembly.Memory constructor missing"
        } else if !self.can_construct_shared_memory {
            "shared WebAssembly.Memory could not be constructed"
        } else {
            "memory buffer is not a SharedArrayBuffer"
        };
        Err(EnvironmentProbeError::SharedMemoryUnavailable(reason.to_string()))
    }
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProbe(pub bool);

impl SharedMemoryProbe for StaticProbe {
    fn probe(&self) -> Result<(), EnvironmentProbeError> {
        if self.0 {
            Ok(())
        } else {
            Err(EnvironmentProbeError::SharedMemoryUnavailable(
                "disabled".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_supported() {
        let diagnostics = ThreadingDiagnostics::all_supported();
        assert!(diagnostics.is_supported());
        assert!(diagnostics.probe().is_ok());
    }

    #[test]
    fn test_non_shared_buffer_unsupported() {
        let diagnostics = ThreadingDiagnostics {
            shared_memory_is_shared_buffer: false,
            ..ThreadingDiagnostics::all_supported()
        };
        assert!(!diagnostics.is_supported());
        match diagnostics.probe() {
            Err(EnvironmentProbeError::SharedMemoryUnavailable(reason)) => {
                assert!(reason.contains("SharedArrayBuffer"));
            }
            other => panic!("Expected SharedMemoryUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_default_diagnostics_unsupported() {
        assert!(ThreadingDiagnostics::default().probe().is_err());
    }

    #[test]
    fn test_static_probe() {
        assert!(StaticProbe(true).probe().is_ok());
        assert!(StaticProbe(false).probe().is_err());
    }
}
