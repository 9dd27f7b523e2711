// ============================================================================
// MPFR Handle
// Owning wrapper around one native floating-point value
// ============================================================================

use super::errors::{HandleError, HandleResult};
use super::state::{HandleState, HandleTransition};
use crate::interfaces::MpfrLibrary;
use crate::native::{DefaultLibrary, MpfrStruct};
use crate::precision::{to_native, Precision, PrecisionPolicy, PrecisionResult};
use std::fmt;
use std::mem;
use std::sync::Arc;

/// Storage for the native value. The tag *is* the lifecycle state: a boxed
/// struct exists exactly while the library considers it initialized.
enum Slot {
    Uninitialized,
    Live(Box<MpfrStruct>),
}

/// Sole owner of one native arbitrary-precision value.
///
/// The handle is either *Uninitialized* or *Live*. Construction allocates
/// through the native library, [`release`](Self::release) and `Drop` give the
/// value back, and every path pairs one `clear` with one `init`. Handles are
/// not `Clone`: a bitwise copy would be cleared twice.
///
/// # Example
/// ```
/// use bigfloat_core::prelude::*;
///
/// let mut x = MpfrHandle::new(Some(53)).unwrap();
/// assert_eq!(x.precision().unwrap(), 53);
///
/// x.set_precision(24).unwrap();
/// assert_eq!(x.precision().unwrap(), 24);
///
/// x.release();
/// x.release(); // no-op
/// assert!(!x.is_live());
/// ```
pub struct MpfrHandle<L: MpfrLibrary = DefaultLibrary> {
    policy: Arc<PrecisionPolicy<L>>,
    slot: Slot,
}

// SAFETY: the boxed struct and the digit storage it points to are reachable
// only through this handle, and the library is `Send + Sync`.
unsafe impl<L: MpfrLibrary> Send for MpfrHandle<L> {}

impl MpfrHandle<DefaultLibrary> {
    /// Allocate a value through the process-global policy.
    ///
    /// `None` uses the default precision at the moment of the call.
    ///
    /// # Errors
    /// Returns `OutOfRange` for an explicit precision outside
    /// `[PREC_MIN, PREC_MAX]`; nothing is allocated in that case.
    pub fn new(precision: Option<Precision>) -> PrecisionResult<Self> {
        Self::with_policy(PrecisionPolicy::global(), precision)
    }

    /// A handle on the global policy that holds no native value yet.
    pub fn uninitialized() -> Self {
        Self::uninitialized_with(PrecisionPolicy::global())
    }
}

impl<L: MpfrLibrary> MpfrHandle<L> {
    /// Allocate a value through `policy`'s library.
    ///
    /// # Errors
    /// Same as [`MpfrHandle::new`].
    pub fn with_policy(
        policy: Arc<PrecisionPolicy<L>>,
        precision: Option<Precision>,
    ) -> PrecisionResult<Self> {
        let mut handle = Self::uninitialized_with(policy);
        handle.reinit(precision)?;
        Ok(handle)
    }

    pub fn uninitialized_with(policy: Arc<PrecisionPolicy<L>>) -> Self {
        Self {
            policy,
            slot: Slot::Uninitialized,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// (Re)construct the native value.
    ///
    /// A live value is released first, then a fresh one is allocated at
    /// `precision`, or at the policy's current default when `None`.
    ///
    /// # Errors
    /// Returns `OutOfRange` for an invalid explicit precision. Validation
    /// happens before anything else, so the handle keeps its previous state
    /// and value.
    pub fn reinit(&mut self, precision: Option<Precision>) -> PrecisionResult<()> {
        let native = precision.map(to_native).transpose()?;

        let (next, effect) = self.state().transition(HandleTransition::Construct);
        if effect.clear {
            self.clear_live();
        }

        if effect.init {
            let mut raw = Box::new(MpfrStruct::zeroed());
            // SAFETY: `raw` is fresh storage the library has never seen, and
            // `native` was validated above.
            unsafe {
                match native {
                    Some(prec) => self.policy.library().init2(&mut *raw, prec),
                    None => self.policy.init_at_default(&mut *raw),
                }
            }
            self.slot = Slot::Live(raw);
        }
        debug_assert_eq!(self.state(), next);

        tracing::debug!(
            requested = ?precision,
            backend = self.policy.library().name(),
            reinitialized = effect.clear,
            "mpfr handle initialized"
        );
        Ok(())
    }

    /// Give the native value back to the library.
    ///
    /// Does nothing on an uninitialized handle, so calling it any number of
    /// times clears the value exactly once.
    pub fn release(&mut self) {
        let (next, effect) = self.state().transition(HandleTransition::Release);
        if effect.clear {
            self.clear_live();
            tracing::debug!(backend = self.policy.library().name(), "mpfr handle released");
        }
        debug_assert_eq!(self.state(), next);
    }

    fn clear_live(&mut self) {
        // Detached first, so the value can never be cleared twice.
        if let Slot::Live(mut raw) = mem::replace(&mut self.slot, Slot::Uninitialized) {
            // SAFETY: `raw` was initialized by this library and is cleared
            // only here, after being detached from the handle.
            unsafe { self.policy.library().clear(&mut *raw) };
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn state(&self) -> HandleState {
        match self.slot {
            Slot::Uninitialized => HandleState::Uninitialized,
            Slot::Live(_) => HandleState::Live,
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.state().is_live()
    }

    /// Precision of the live value, as reported by the native library.
    ///
    /// # Errors
    /// Returns `Uninitialized` when the handle holds no value.
    pub fn precision(&self) -> HandleResult<Precision> {
        match &self.slot {
            Slot::Live(raw) => {
                // SAFETY: live values are initialized.
                let precision = unsafe { self.policy.library().get_prec(&**raw) } as Precision;
                tracing::trace!(precision, "mpfr precision queried");
                Ok(precision)
            }
            Slot::Uninitialized => Err(HandleError::Uninitialized),
        }
    }

    /// Change the precision of the live value.
    ///
    /// The native library discards the stored value when it resizes, so
    /// nothing but the precision survives this call.
    ///
    /// # Errors
    /// - `OutOfRange` if `precision` fails validation (checked first; the
    ///   value is untouched)
    /// - `Uninitialized` when the handle holds no value
    pub fn set_precision(&mut self, precision: Precision) -> HandleResult<()> {
        let native = to_native(precision)?;
        match &mut self.slot {
            Slot::Live(raw) => {
                // SAFETY: live values are initialized and `native` is in range.
                unsafe { self.policy.library().set_prec(&mut **raw, native) };
                tracing::trace!(precision, "mpfr precision changed");
                Ok(())
            }
            Slot::Uninitialized => Err(HandleError::Uninitialized),
        }
    }

    /// Pointer to the live native struct, for passing to further native
    /// calls. The pointer is valid until the handle is released or
    /// reinitialized.
    pub fn as_raw(&self) -> Option<*const MpfrStruct> {
        match &self.slot {
            Slot::Live(raw) => Some(&**raw as *const MpfrStruct),
            Slot::Uninitialized => None,
        }
    }

    /// Mutable counterpart of [`as_raw`](Self::as_raw).
    pub fn as_raw_mut(&mut self) -> Option<*mut MpfrStruct> {
        match &mut self.slot {
            Slot::Live(raw) => Some(&mut **raw as *mut MpfrStruct),
            Slot::Uninitialized => None,
        }
    }

    /// The policy this handle allocates through.
    pub fn policy(&self) -> &Arc<PrecisionPolicy<L>> {
        &self.policy
    }
}

impl<L: MpfrLibrary> Drop for MpfrHandle<L> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<L: MpfrLibrary> fmt::Debug for MpfrHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("MpfrHandle");
        out.field("state", &self.state());
        if let Ok(precision) = self.precision() {
            out.field("precision", &precision);
        }
        out.field("backend", &self.policy.library().name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{NativeCall, RecordingLibrary, SoftMpfr, DEFAULT_PRECISION};
    use crate::precision::{PrecisionError, PREC_MAX, PREC_MIN};

    type Recorded = MpfrHandle<RecordingLibrary>;

    fn recording_policy() -> Arc<PrecisionPolicy<RecordingLibrary>> {
        Arc::new(PrecisionPolicy::new(RecordingLibrary::new(SoftMpfr::new())))
    }

    #[test]
    fn test_default_construction_uses_library_default() {
        let policy = recording_policy();
        let x = Recorded::with_policy(Arc::clone(&policy), None).unwrap();

        assert!(x.is_live());
        assert_eq!(x.precision().unwrap(), DEFAULT_PRECISION as Precision);
        assert_eq!(policy.library().calls()[0], NativeCall::Init);
    }

    #[test]
    fn test_explicit_construction() {
        let policy = recording_policy();
        let x = Recorded::with_policy(Arc::clone(&policy), Some(200)).unwrap();

        assert_eq!(x.precision().unwrap(), 200);
        assert_eq!(policy.library().calls()[0], NativeCall::Init2(200));
    }

    #[test]
    fn test_invalid_construction_allocates_nothing() {
        let policy = recording_policy();

        let err = Recorded::with_policy(Arc::clone(&policy), Some(1)).unwrap_err();
        assert_eq!(err, PrecisionError::OutOfRange { precision: 1 });
        assert!(Recorded::with_policy(Arc::clone(&policy), Some(PREC_MAX + 1)).is_err());

        assert!(policy.library().calls().is_empty());
        assert_eq!(policy.library().live_values(), 0);
    }

    #[test]
    fn test_boundary_precisions() {
        let policy = recording_policy();

        let lo = Recorded::with_policy(Arc::clone(&policy), Some(PREC_MIN)).unwrap();
        let hi = Recorded::with_policy(Arc::clone(&policy), Some(PREC_MAX)).unwrap();
        assert_eq!(lo.precision().unwrap(), PREC_MIN);
        assert_eq!(hi.precision().unwrap(), PREC_MAX);

        assert!(Recorded::with_policy(Arc::clone(&policy), Some(PREC_MIN - 1)).is_err());
        assert!(Recorded::with_policy(Arc::clone(&policy), Some(PREC_MAX + 1)).is_err());
    }

    #[test]
    fn test_double_release_clears_once() {
        let policy = recording_policy();
        let mut x = Recorded::with_policy(Arc::clone(&policy), Some(53)).unwrap();

        x.release();
        x.release();
        drop(x);

        let lib = policy.library();
        assert_eq!(lib.init_count(), 1);
        assert_eq!(lib.clear_count(), 1);
        assert!(lib.is_balanced());
    }

    #[test]
    fn test_release_uninitialized_is_noop() {
        let policy = recording_policy();
        let mut x = Recorded::uninitialized_with(Arc::clone(&policy));

        x.release();
        assert_eq!(x.state(), HandleState::Uninitialized);
        drop(x);
        assert!(policy.library().calls().is_empty());
    }

    #[test]
    fn test_reinit_clears_then_inits() {
        let policy = recording_policy();
        let mut x = Recorded::with_policy(Arc::clone(&policy), Some(53)).unwrap();
        policy.library().reset();

        x.reinit(Some(113)).unwrap();
        assert_eq!(
            policy.library().calls(),
            vec![NativeCall::Clear, NativeCall::Init2(113)]
        );
        assert_eq!(x.precision().unwrap(), 113);
        assert_eq!(policy.library().peak_live_values(), 1);
    }

    #[test]
    fn test_native_calls_follow_transition_table() {
        let policy = recording_policy();
        let mut x = Recorded::uninitialized_with(Arc::clone(&policy));

        for step in [
            HandleTransition::Construct,
            HandleTransition::Construct,
            HandleTransition::Release,
            HandleTransition::Release,
        ] {
            let (next, effect) = x.state().transition(step);
            policy.library().reset();
            match step {
                HandleTransition::Construct => x.reinit(Some(64)).unwrap(),
                HandleTransition::Release => x.release(),
            }
            let lib = policy.library();
            assert_eq!(x.state(), next);
            assert_eq!(lib.clear_count(), effect.clear as usize);
            assert_eq!(lib.init_count(), effect.init as usize);
        }
        assert!(policy.library().is_balanced());
    }

    #[test]
    fn test_failed_reinit_keeps_live_value() {
        let policy = recording_policy();
        let mut x = Recorded::with_policy(Arc::clone(&policy), Some(53)).unwrap();
        policy.library().reset();

        assert!(x.reinit(Some(0)).is_err());
        assert!(x.is_live());
        assert!(policy.library().calls().is_empty());
        assert_eq!(x.precision().unwrap(), 53);
    }

    #[test]
    fn test_reinit_after_release() {
        let policy = recording_policy();
        let mut x = Recorded::with_policy(Arc::clone(&policy), Some(53)).unwrap();

        x.release();
        x.reinit(None).unwrap();
        assert!(x.is_live());
        drop(x);

        assert_eq!(policy.library().init_count(), 2);
        assert_eq!(policy.library().clear_count(), 2);
        assert!(policy.library().is_balanced());
    }

    #[test]
    fn test_set_precision_validates_first() {
        let policy = recording_policy();
        let mut x = Recorded::with_policy(Arc::clone(&policy), Some(53)).unwrap();

        assert_eq!(
            x.set_precision(1),
            Err(HandleError::OutOfRange(PrecisionError::OutOfRange {
                precision: 1
            }))
        );
        assert!(x.set_precision(PREC_MAX + 1).is_err());
        assert_eq!(x.precision().unwrap(), 53);
        assert_eq!(
            policy
                .library()
                .count(|c| matches!(c, NativeCall::SetPrec(_))),
            0
        );
    }

    #[test]
    fn test_accessors_on_uninitialized() {
        let policy = recording_policy();
        let mut x = Recorded::uninitialized_with(Arc::clone(&policy));

        assert_eq!(x.precision(), Err(HandleError::Uninitialized));
        assert_eq!(x.set_precision(24), Err(HandleError::Uninitialized));
        assert!(x.as_raw().is_none());
        assert!(x.as_raw_mut().is_none());
        assert!(policy.library().calls().is_empty());
    }

    #[test]
    fn test_raw_pointer_is_stable_while_live() {
        let policy = recording_policy();
        let mut x = Recorded::with_policy(Arc::clone(&policy), Some(64)).unwrap();

        let before = x.as_raw().unwrap();
        x.set_precision(128).unwrap();
        assert_eq!(x.as_raw().unwrap(), before);
        assert_eq!(x.as_raw_mut().unwrap() as *const MpfrStruct, before);
    }

    #[test]
    fn test_default_path_follows_policy_changes() {
        let policy = recording_policy();
        policy.set_default_precision(1000).unwrap();

        let by_default = Recorded::with_policy(Arc::clone(&policy), None).unwrap();
        let explicit = Recorded::with_policy(Arc::clone(&policy), Some(1000)).unwrap();
        assert_eq!(
            by_default.precision().unwrap(),
            explicit.precision().unwrap()
        );

        policy.set_default_precision(24).unwrap();
        // Existing values keep their precision.
        assert_eq!(by_default.precision().unwrap(), 1000);
    }

    #[test]
    fn test_end_to_end_lifecycle() {
        let policy = recording_policy();
        {
            let mut x = Recorded::with_policy(Arc::clone(&policy), Some(53)).unwrap();
            assert_eq!(x.precision().unwrap(), 53);
            x.set_precision(24).unwrap();
            assert_eq!(x.precision().unwrap(), 24);
        }
        assert_eq!(policy.library().clear_count(), 1);
        assert_eq!(policy.library().live_values(), 0);
        assert_eq!(policy.library().inner().live_values(), 0);
    }

    #[test]
    fn test_handle_moves_across_threads() {
        let policy = recording_policy();
        let x = Recorded::with_policy(Arc::clone(&policy), Some(80)).unwrap();

        let precision = std::thread::spawn(move || x.precision().unwrap())
            .join()
            .unwrap();
        assert_eq!(precision, 80);
        assert_eq!(policy.library().clear_count(), 1);
    }

    #[test]
    fn test_debug_output() {
        let policy = recording_policy();
        let x = Recorded::with_policy(Arc::clone(&policy), Some(53)).unwrap();
        let text = format!("{:?}", x);
        assert!(text.contains("Live"));
        assert!(text.contains("53"));
    }
}
