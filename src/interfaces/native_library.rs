// ============================================================================
// Native Library Interface
// Defines the foreign-call boundary to the arbitrary-precision float library
// ============================================================================

use crate::native::{MpfrStruct, PrecT};
use parking_lot::Mutex;

/// The entry points this crate consumes from a native MPFR-style library.
///
/// Implementations own the process-wide default-precision slot and the digit
/// storage of every value they initialize. Callers are responsible for the
/// preconditions listed on each method; nothing here validates precisions.
/// Every call that takes a precision is `unsafe`, so an out-of-range value
/// can only reach the slot through
/// [`PrecisionPolicy::set_default_precision`](crate::precision::PrecisionPolicy::set_default_precision),
/// which validates first:
///
/// ```compile_fail,E0133
/// use bigfloat_core::prelude::*;
///
/// let policy = PrecisionPolicy::new(SoftMpfr::new());
/// policy.library().set_default_prec(1);
/// ```
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single library can back handles
/// living on different threads. [`default_slot`](Self::default_slot) is the
/// lock [`PrecisionPolicy`](crate::precision::PrecisionPolicy) takes around
/// the default-precision slot; it must be exactly as shared as the slot.
pub trait MpfrLibrary: Send + Sync {
    /// Initialize `x` at the current default precision.
    ///
    /// # Safety
    /// `x` must be valid for writes and must not currently hold an
    /// initialized value.
    unsafe fn init(&self, x: *mut MpfrStruct);

    /// Initialize `x` at precision `prec`.
    ///
    /// # Safety
    /// Same as [`init`](Self::init); additionally `prec` must lie within
    /// `[PREC_MIN, PREC_MAX]`.
    unsafe fn init2(&self, x: *mut MpfrStruct, prec: PrecT);

    /// Release the storage held by `x`.
    ///
    /// # Safety
    /// `x` must hold a value initialized by this library and not yet cleared.
    unsafe fn clear(&self, x: *mut MpfrStruct);

    /// Replace the process-wide default precision.
    ///
    /// # Safety
    /// `prec` must lie within `[PREC_MIN, PREC_MAX]`. Every later
    /// [`init`](Self::init) allocates at this precision.
    unsafe fn set_default_prec(&self, prec: PrecT);

    /// Read the process-wide default precision.
    fn get_default_prec(&self) -> PrecT;

    /// Change the precision of `x`, discarding its value.
    ///
    /// # Safety
    /// `x` must hold an initialized value and `prec` must be in range.
    unsafe fn set_prec(&self, x: *mut MpfrStruct, prec: PrecT);

    /// Read the precision of `x`.
    ///
    /// # Safety
    /// `x` must hold an initialized value.
    unsafe fn get_prec(&self, x: *const MpfrStruct) -> PrecT;

    /// Lock serializing writers and readers of the default-precision slot.
    ///
    /// A library whose slot is process-global must return a process-global
    /// lock, so that every policy over it contends on the same mutex.
    fn default_slot(&self) -> &Mutex<()>;

    /// Name of this backend, used in logs.
    fn name(&self) -> &'static str;
}
