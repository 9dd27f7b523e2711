// ============================================================================
// Handle Errors
// ============================================================================

use crate::precision::PrecisionError;
use std::fmt;

/// Errors from precision accessors on a [`MpfrHandle`](super::MpfrHandle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleError {
    /// The requested precision failed validation
    OutOfRange(PrecisionError),
    /// The handle holds no native value
    Uninitialized,
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::OutOfRange(err) => write!(f, "{}", err),
            HandleError::Uninitialized => write!(f, "handle holds no native value"),
        }
    }
}

impl std::error::Error for HandleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandleError::OutOfRange(err) => Some(err),
            HandleError::Uninitialized => None,
        }
    }
}

impl From<PrecisionError> for HandleError {
    fn from(err: PrecisionError) -> Self {
        HandleError::OutOfRange(err)
    }
}

/// Result type alias for handle accessors
pub type HandleResult<T> = Result<T, HandleError>;
