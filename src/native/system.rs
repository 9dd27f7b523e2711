// ============================================================================
// System Native Library
// Binding to the installed libmpfr (feature "system-mpfr")
// ============================================================================

use super::layout::{MpfrStruct, PrecT};
use crate::interfaces::MpfrLibrary;
use parking_lot::{const_mutex, Mutex};

#[link(name = "mpfr")]
extern "C" {
    fn mpfr_init(x: *mut MpfrStruct);
    fn mpfr_init2(x: *mut MpfrStruct, prec: PrecT);
    fn mpfr_clear(x: *mut MpfrStruct);
    fn mpfr_set_default_prec(prec: PrecT);
    fn mpfr_get_default_prec() -> PrecT;
    fn mpfr_set_prec(x: *mut MpfrStruct, prec: PrecT);
    fn mpfr_get_prec(x: *const MpfrStruct) -> PrecT;
}

/// One lock for libmpfr's single default-precision slot, however many
/// policies are built over `SystemMpfr`.
static DEFAULT_SLOT: Mutex<()> = const_mutex(());

/// The process's libmpfr.
///
/// Every `SystemMpfr` value shares libmpfr's default-precision slot and one
/// process-global lock over it. A libmpfr built with thread-local storage
/// keeps the slot per thread; the process-global lock still covers it.
/// Allocation failures inside libmpfr abort the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMpfr;

impl SystemMpfr {
    pub const fn new() -> Self {
        Self
    }
}

impl MpfrLibrary for SystemMpfr {
    unsafe fn init(&self, x: *mut MpfrStruct) {
        mpfr_init(x);
    }

    unsafe fn init2(&self, x: *mut MpfrStruct, prec: PrecT) {
        mpfr_init2(x, prec);
    }

    unsafe fn clear(&self, x: *mut MpfrStruct) {
        mpfr_clear(x);
    }

    unsafe fn set_default_prec(&self, prec: PrecT) {
        mpfr_set_default_prec(prec);
    }

    fn get_default_prec(&self) -> PrecT {
        // SAFETY: pure read of library state.
        unsafe { mpfr_get_default_prec() }
    }

    unsafe fn set_prec(&self, x: *mut MpfrStruct, prec: PrecT) {
        mpfr_set_prec(x, prec);
    }

    unsafe fn get_prec(&self, x: *const MpfrStruct) -> PrecT {
        mpfr_get_prec(x)
    }

    fn default_slot(&self) -> &Mutex<()> {
        &DEFAULT_SLOT
    }

    fn name(&self) -> &'static str {
        "libmpfr"
    }
}
