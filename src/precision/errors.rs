// ============================================================================
// Precision Errors
// Error type for precision validation
// ============================================================================

use super::bounds::{Precision, PREC_MAX, PREC_MIN};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised while validating a precision.
///
/// Always raised before any native call, so the native state it guards is
/// unchanged when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrecisionError {
    /// Precision outside `[PREC_MIN, PREC_MAX]`
    OutOfRange { precision: Precision },
}

impl PrecisionError {
    /// The rejected precision.
    pub fn precision(&self) -> Precision {
        match self {
            PrecisionError::OutOfRange { precision } => *precision,
        }
    }
}

impl fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionError::OutOfRange { precision } => write!(
                f,
                "precision out of range: {} not in [{}, {}]",
                precision, PREC_MIN, PREC_MAX
            ),
        }
    }
}

impl std::error::Error for PrecisionError {}

/// Result type alias for precision operations
pub type PrecisionResult<T> = Result<T, PrecisionError>;
