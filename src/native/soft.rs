// ============================================================================
// Soft Native Library
// In-process implementation of the native library contract
// ============================================================================
//
// Mirrors what libmpfr does at the lifecycle level:
// - a default-precision slot, initially 53 bits
// - init/init2 allocate digit storage and tag the value as NaN
// - set_prec frees and reallocates storage, discarding the value
// - clear frees the storage
//
// No arithmetic is performed, so storage is capped at SOFT_LIMB_LIMIT limbs
// regardless of the requested precision. This keeps PREC_MAX initializable.
// ============================================================================

use super::layout::{Limb, MpfrStruct, PrecT, EXP_NAN, SIGN_POS};
use crate::interfaces::MpfrLibrary;
use parking_lot::{const_mutex, Mutex};
use std::ptr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Default precision a fresh library starts with (IEEE double significand).
pub const DEFAULT_PRECISION: PrecT = 53;

/// Maximum number of limbs the soft library allocates per value.
pub const SOFT_LIMB_LIMIT: usize = 64;

const LIMB_BITS: u64 = Limb::BITS as u64;

/// Pure-Rust native library.
///
/// Each instance owns its own default-precision slot, and the lock guarding
/// it, so independent instances never observe each other's configuration.
#[derive(Debug)]
pub struct SoftMpfr {
    default_prec: AtomicU64,
    slot: Mutex<()>,
    live: AtomicUsize,
}

impl SoftMpfr {
    /// Create a library whose default precision is [`DEFAULT_PRECISION`].
    pub const fn new() -> Self {
        Self {
            default_prec: AtomicU64::new(DEFAULT_PRECISION as u64),
            slot: const_mutex(()),
            live: AtomicUsize::new(0),
        }
    }

    /// Number of values currently holding storage from this library.
    #[inline]
    pub fn live_values(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Number of limbs allocated for a value of precision `prec`.
    #[inline]
    pub fn limbs_for(prec: PrecT) -> usize {
        let needed = (prec as u64).div_ceil(LIMB_BITS);
        needed.min(SOFT_LIMB_LIMIT as u64) as usize
    }

    fn allocate(&self, prec: PrecT) -> *mut Limb {
        let storage = vec![0 as Limb; Self::limbs_for(prec)].into_boxed_slice();
        self.live.fetch_add(1, Ordering::AcqRel);
        Box::into_raw(storage) as *mut Limb
    }

    /// # Safety
    /// `d` must come from `allocate(prec)` with the same `prec`.
    unsafe fn free(&self, d: *mut Limb, prec: PrecT) {
        let len = Self::limbs_for(prec);
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(d, len)));
        self.live.fetch_sub(1, Ordering::AcqRel);
    }

    unsafe fn fill(&self, x: *mut MpfrStruct, prec: PrecT) {
        let d = self.allocate(prec);
        x.write(MpfrStruct {
            prec,
            sign: SIGN_POS,
            exp: EXP_NAN,
            d,
        });
    }
}

impl Default for SoftMpfr {
    fn default() -> Self {
        Self::new()
    }
}

impl MpfrLibrary for SoftMpfr {
    unsafe fn init(&self, x: *mut MpfrStruct) {
        let prec = self.get_default_prec();
        self.fill(x, prec);
    }

    unsafe fn init2(&self, x: *mut MpfrStruct, prec: PrecT) {
        self.fill(x, prec);
    }

    unsafe fn clear(&self, x: *mut MpfrStruct) {
        let value = &mut *x;
        debug_assert!(!value.d.is_null(), "clear on a value without storage");
        if value.d.is_null() {
            return;
        }
        self.free(value.d, value.prec);
        value.d = ptr::null_mut();
    }

    unsafe fn set_default_prec(&self, prec: PrecT) {
        self.default_prec.store(prec as u64, Ordering::Release);
    }

    fn get_default_prec(&self) -> PrecT {
        self.default_prec.load(Ordering::Acquire) as PrecT
    }

    unsafe fn set_prec(&self, x: *mut MpfrStruct, prec: PrecT) {
        let value = &mut *x;
        self.free(value.d, value.prec);
        value.d = self.allocate(prec);
        value.prec = prec;
        value.sign = SIGN_POS;
        value.exp = EXP_NAN;
    }

    unsafe fn get_prec(&self, x: *const MpfrStruct) -> PrecT {
        (*x).prec
    }

    fn default_slot(&self) -> &Mutex<()> {
        &self.slot
    }

    fn name(&self) -> &'static str {
        "soft"
    }
}
