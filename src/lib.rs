// ============================================================================
// BigFloat Core Library
// Lifecycle-safe handles over native arbitrary-precision floating-point values
// ============================================================================

//! # BigFloat Core
//!
//! Ownership and configuration layer beneath an MPFR-style arbitrary-precision
//! binary floating-point library.
//!
//! ## Features
//!
//! - **Exactly-once release** of every native value, whether the handle is
//!   released explicitly, reinitialized or dropped
//! - **Validated precisions**: everything outside `[PREC_MIN, PREC_MAX]` is
//!   rejected before the native library sees it
//! - **Process-wide default precision** with the setter serialized against
//!   default-precision constructions
//! - **Pluggable native backends**: an in-process library by default, the
//!   installed `libmpfr` with the `system-mpfr` feature, and a recording
//!   wrapper that audits the lifecycle in tests
//!
//! ## Example
//!
//! ```rust
//! use bigfloat_core::prelude::*;
//! use std::sync::Arc;
//!
//! // A private policy over an instrumented in-process library
//! let policy = Arc::new(PrecisionPolicy::new(RecordingLibrary::new(SoftMpfr::new())));
//! policy.set_default_precision(1000).unwrap();
//!
//! let mut x = MpfrHandle::with_policy(Arc::clone(&policy), None).unwrap();
//! assert_eq!(x.precision().unwrap(), 1000);
//!
//! x.set_precision(24).unwrap();
//! drop(x);
//!
//! assert_eq!(policy.library().init_count(), 1);
//! assert_eq!(policy.library().clear_count(), 1);
//! ```

pub mod config;
pub mod handle;
pub mod interfaces;
pub mod native;
pub mod precision;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{PrecisionConfig, PrecisionPreset};
    pub use crate::handle::{HandleError, HandleResult, HandleState, MpfrHandle};
    pub use crate::interfaces::MpfrLibrary;
    pub use crate::native::{DefaultLibrary, MpfrStruct, RecordingLibrary, SoftMpfr};
    pub use crate::precision::{
        get_default_precision, is_valid_precision, set_default_precision, validate_precision,
        Precision, PrecisionError, PrecisionPolicy, PrecisionResult, PREC_MAX, PREC_MIN,
    };
}
