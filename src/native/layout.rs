// ============================================================================
// Native Struct Layout
// C-compatible mirror of the native library's floating-point value struct
// ============================================================================

use std::os::raw::{c_int, c_long, c_ulong};
use std::ptr;

/// Native integer type used for precisions (`mpfr_prec_t`).
pub type PrecT = c_ulong;

/// Native integer type used for exponents (`mpfr_exp_t`).
pub type ExpT = c_ulong;

/// Native integer type used for the sign (`mpfr_sign_t`).
pub type SignT = c_int;

/// One digit of library-owned significand storage (`mp_limb_t`).
pub type Limb = c_long;

/// Positive sign marker.
pub const SIGN_POS: SignT = 1;

/// Exponent bit pattern the native library uses to tag NaN.
///
/// Freshly initialized values are NaN.
pub const EXP_NAN: ExpT = !(ExpT::MAX >> 1) + 2;

/// Native floating-point value (`__mpfr_struct`).
///
/// Field order and widths are consumed verbatim from the native library.
/// The digit pointer is owned by the library: this crate never reads,
/// writes or frees it, only passes the whole struct by pointer.
#[repr(C)]
#[derive(Debug)]
pub struct MpfrStruct {
    pub prec: PrecT,
    pub sign: SignT,
    pub exp: ExpT,
    pub d: *mut Limb,
}

impl MpfrStruct {
    /// Storage that has not been handed to the native library yet.
    ///
    /// Every field is overwritten by `init`/`init2`.
    #[inline]
    pub const fn zeroed() -> Self {
        Self {
            prec: 0,
            sign: 0,
            exp: 0,
            d: ptr::null_mut(),
        }
    }
}

impl Default for MpfrStruct {
    fn default() -> Self {
        Self::zeroed()
    }
}
