// ============================================================================
// Precision Module
// Bounds, validation and the process-wide default precision
// ============================================================================
//
// This module provides:
// - PREC_MIN / PREC_MAX and the guards built on them
// - PrecisionError: the single error kind of this layer
// - PrecisionPolicy: default-precision access for one native library
// - set_default_precision / get_default_precision on the global policy

mod bounds;
mod errors;
mod policy;

pub use bounds::{is_valid_precision, validate_precision, Precision, PREC_MAX, PREC_MIN};
pub(crate) use bounds::to_native;
pub use errors::{PrecisionError, PrecisionResult};
pub use policy::{get_default_precision, set_default_precision, PrecisionPolicy};
