// ============================================================================
// Handle Module
// Lifecycle-safe ownership of native floating-point values
// ============================================================================

mod errors;
mod mpfr_handle;
mod state;

pub use errors::{HandleError, HandleResult};
pub use mpfr_handle::MpfrHandle;
pub use state::{HandleState, HandleTransition, TransitionEffect};
