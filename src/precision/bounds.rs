// ============================================================================
// Precision Bounds
// Fixed limits on significand width and the guards that enforce them
// ============================================================================

use super::errors::{PrecisionError, PrecisionResult};
use crate::native::PrecT;

/// Number of significand bits.
///
/// Wider than the native precision type on some platforms so that
/// `PREC_MAX + 1` can always be expressed and rejected.
pub type Precision = u64;

/// Smallest precision the native library accepts.
pub const PREC_MIN: Precision = 2;

/// Largest precision the native library accepts.
///
/// Half the unsigned range of the native precision type; the library keeps
/// the top bit for internal use.
pub const PREC_MAX: Precision = (PrecT::MAX >> 1) as Precision;

/// Non-failing companion of [`validate_precision`].
#[inline]
pub const fn is_valid_precision(precision: Precision) -> bool {
    PREC_MIN <= precision && precision <= PREC_MAX
}

/// Reject precisions outside `[PREC_MIN, PREC_MAX]`.
///
/// # Errors
/// Returns `OutOfRange` carrying the rejected value.
#[inline]
pub fn validate_precision(precision: Precision) -> PrecisionResult<()> {
    if is_valid_precision(precision) {
        Ok(())
    } else {
        Err(PrecisionError::OutOfRange { precision })
    }
}

/// Validate and narrow to the native precision type.
#[inline]
pub(crate) fn to_native(precision: Precision) -> PrecisionResult<PrecT> {
    validate_precision(precision)?;
    // Lossless: PREC_MAX fits in PrecT.
    Ok(precision as PrecT)
}
