// ============================================================================
// Native Module
// Foreign-call boundary: struct layout and library backends
// ============================================================================
//
// This module provides:
// - MpfrStruct and the native integer types it is built from
// - SoftMpfr: in-process backend, the default
// - SystemMpfr: the installed libmpfr (feature "system-mpfr")
// - RecordingLibrary: instrumented wrapper that audits the lifecycle
//
// DefaultLibrary names the backend behind the process-global policy.
// ============================================================================

mod layout;
mod recording;
mod soft;
#[cfg(feature = "system-mpfr")]
mod system;

pub use layout::{ExpT, Limb, MpfrStruct, PrecT, SignT, EXP_NAN, SIGN_POS};
pub use recording::{NativeCall, RecordingLibrary, Violation};
pub use soft::{SoftMpfr, DEFAULT_PRECISION, SOFT_LIMB_LIMIT};
#[cfg(feature = "system-mpfr")]
pub use system::SystemMpfr;

/// Backend used by the process-global precision policy.
#[cfg(not(feature = "system-mpfr"))]
pub type DefaultLibrary = SoftMpfr;

/// Backend used by the process-global precision policy.
#[cfg(feature = "system-mpfr")]
pub type DefaultLibrary = SystemMpfr;
