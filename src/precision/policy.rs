// ============================================================================
// Precision Policy
// Process-wide default precision, validated on the way in
// ============================================================================

use super::bounds::{to_native, Precision};
use super::errors::PrecisionResult;
use crate::interfaces::MpfrLibrary;
use crate::native::{DefaultLibrary, MpfrStruct};
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<Arc<PrecisionPolicy<DefaultLibrary>>> =
    LazyLock::new(|| Arc::new(PrecisionPolicy::new(DefaultLibrary::default())));

/// Binds a native library to the rules for its default precision.
///
/// The default-precision slot itself lives in the library, together with the
/// lock guarding it ([`MpfrLibrary::default_slot`]). The policy validates
/// writes and holds that lock around them and around constructions that read
/// the slot, so a handle created without an explicit precision never races a
/// concurrent [`set_default_precision`](Self::set_default_precision), even one
/// issued through another policy over the same slot.
pub struct PrecisionPolicy<L: MpfrLibrary> {
    library: L,
}

impl PrecisionPolicy<DefaultLibrary> {
    /// The process-wide policy used by handles that do not name one.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }
}

impl<L: MpfrLibrary> PrecisionPolicy<L> {
    pub fn new(library: L) -> Self {
        Self { library }
    }

    /// The native library behind this policy.
    #[inline]
    pub fn library(&self) -> &L {
        &self.library
    }

    /// Replace the default precision used by later default constructions.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `precision` is outside `[PREC_MIN, PREC_MAX]`;
    /// the library is not called in that case.
    pub fn set_default_precision(&self, precision: Precision) -> PrecisionResult<()> {
        let native = to_native(precision)?;
        let _slot = self.library.default_slot().lock();
        // SAFETY: `native` passed validation.
        unsafe { self.library.set_default_prec(native) };
        tracing::debug!(precision, backend = self.library.name(), "default precision set");
        Ok(())
    }

    /// The default precision as currently held by the library.
    pub fn default_precision(&self) -> Precision {
        let _slot = self.library.default_slot().lock();
        self.library.get_default_prec() as Precision
    }

    /// Initialize `x` at the default precision while holding the slot lock.
    ///
    /// # Safety
    /// Same contract as [`MpfrLibrary::init`].
    pub(crate) unsafe fn init_at_default(&self, x: *mut MpfrStruct) {
        let _slot = self.library.default_slot().lock();
        self.library.init(x);
    }
}

impl<L: MpfrLibrary + Default> Default for PrecisionPolicy<L> {
    fn default() -> Self {
        Self::new(L::default())
    }
}

impl<L: MpfrLibrary> std::fmt::Debug for PrecisionPolicy<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrecisionPolicy")
            .field("backend", &self.library.name())
            .finish()
    }
}

// ============================================================================
// Process-wide Functions
// ============================================================================

/// Set the process-wide default precision.
///
/// Affects every later handle constructed without an explicit precision.
///
/// # Errors
/// Returns `OutOfRange` if `precision` is outside `[PREC_MIN, PREC_MAX]`.
pub fn set_default_precision(precision: Precision) -> PrecisionResult<()> {
    GLOBAL.set_default_precision(precision)
}

/// The process-wide default precision.
pub fn get_default_precision() -> Precision {
    GLOBAL.default_precision()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::MpfrHandle;
    use crate::native::{NativeCall, PrecT, RecordingLibrary, SoftMpfr, DEFAULT_PRECISION};
    use crate::precision::{PrecisionError, PREC_MAX, PREC_MIN};
    use parking_lot::Mutex;
    use std::time::Duration;

    fn recording_policy() -> PrecisionPolicy<RecordingLibrary> {
        PrecisionPolicy::new(RecordingLibrary::new(SoftMpfr::new()))
    }

    // Forwards to one static library, as every `SystemMpfr` does to libmpfr.
    static SHARED: SoftMpfr = SoftMpfr::new();

    struct SharedSlot;

    impl MpfrLibrary for SharedSlot {
        unsafe fn init(&self, x: *mut MpfrStruct) {
            SHARED.init(x)
        }

        unsafe fn init2(&self, x: *mut MpfrStruct, prec: PrecT) {
            SHARED.init2(x, prec)
        }

        unsafe fn clear(&self, x: *mut MpfrStruct) {
            SHARED.clear(x)
        }

        unsafe fn set_default_prec(&self, prec: PrecT) {
            SHARED.set_default_prec(prec)
        }

        fn get_default_prec(&self) -> PrecT {
            SHARED.get_default_prec()
        }

        unsafe fn set_prec(&self, x: *mut MpfrStruct, prec: PrecT) {
            SHARED.set_prec(x, prec)
        }

        unsafe fn get_prec(&self, x: *const MpfrStruct) -> PrecT {
            SHARED.get_prec(x)
        }

        fn default_slot(&self) -> &Mutex<()> {
            SHARED.default_slot()
        }

        fn name(&self) -> &'static str {
            "shared"
        }
    }

    #[test]
    fn test_initial_default_comes_from_library() {
        let policy = recording_policy();
        assert_eq!(policy.default_precision(), DEFAULT_PRECISION as Precision);
    }

    #[test]
    fn test_set_then_get() {
        let policy = recording_policy();
        policy.set_default_precision(1000).unwrap();
        assert_eq!(policy.default_precision(), 1000);

        policy.set_default_precision(PREC_MIN).unwrap();
        assert_eq!(policy.default_precision(), PREC_MIN);
    }

    #[test]
    fn test_rejected_value_never_reaches_library() {
        let policy = recording_policy();

        assert_eq!(
            policy.set_default_precision(1),
            Err(PrecisionError::OutOfRange { precision: 1 })
        );
        assert!(policy.set_default_precision(PREC_MAX + 1).is_err());

        let writes = policy
            .library()
            .count(|c| matches!(c, NativeCall::SetDefaultPrec(_)));
        assert_eq!(writes, 0);
        assert_eq!(policy.default_precision(), DEFAULT_PRECISION as Precision);
    }

    #[test]
    fn test_concurrent_setters_leave_a_valid_default() {
        let policy = Arc::new(PrecisionPolicy::new(SoftMpfr::new()));

        let workers: Vec<_> = (0..4u64)
            .map(|i| {
                let policy = Arc::clone(&policy);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        policy.set_default_precision(100 + i).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert!((100..104).contains(&policy.default_precision()));
    }

    #[test]
    fn test_global_policy_is_shared() {
        assert!(Arc::ptr_eq(
            &PrecisionPolicy::global(),
            &PrecisionPolicy::global()
        ));
    }

    #[test]
    fn test_policies_over_one_slot_serialize_on_one_lock() {
        let first = PrecisionPolicy::new(SharedSlot);
        let second = Arc::new(PrecisionPolicy::new(SharedSlot));
        assert!(std::ptr::eq(
            first.library().default_slot(),
            second.library().default_slot()
        ));

        let held = first.library().default_slot().lock();
        let setter = {
            let second = Arc::clone(&second);
            std::thread::spawn(move || second.set_default_precision(256).unwrap())
        };
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(SHARED.get_default_prec(), DEFAULT_PRECISION);

        drop(held);
        setter.join().unwrap();
        assert_eq!(first.default_precision(), 256);

        let x = MpfrHandle::with_policy(second, None).unwrap();
        assert_eq!(x.precision().unwrap(), 256);
    }

    #[test]
    fn test_default_construction_never_sees_rejected_precision() {
        let policy = Arc::new(PrecisionPolicy::new(SoftMpfr::new()));
        for rejected in [0, 1, PREC_MAX + 1] {
            assert!(policy.set_default_precision(rejected).is_err());
            let x = MpfrHandle::with_policy(Arc::clone(&policy), None).unwrap();
            let observed = x.precision().unwrap();
            assert!((PREC_MIN..=PREC_MAX).contains(&observed));
            assert_eq!(observed, DEFAULT_PRECISION as Precision);
        }
    }
}
