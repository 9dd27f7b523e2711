// ============================================================================
// Recording Native Library
// Instrumented wrapper that audits every foreign call
// ============================================================================

use super::layout::{MpfrStruct, PrecT};
use super::soft::SoftMpfr;
use crate::interfaces::MpfrLibrary;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One call that crossed the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    Init,
    Init2(PrecT),
    Clear,
    SetDefaultPrec(PrecT),
    GetDefaultPrec,
    SetPrec(PrecT),
    GetPrec,
}

impl NativeCall {
    /// True for calls that allocate a value.
    pub fn is_init(&self) -> bool {
        matches!(self, NativeCall::Init | NativeCall::Init2(_))
    }
}

/// Lifecycle contract breaches detected by [`RecordingLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `init`/`init2` on storage that is already live
    DoubleInit,
    /// `clear` on storage that is not live (double free or never initialized)
    ClearWithoutInit,
    /// Precision access on storage that is not live
    AccessWithoutInit,
}

/// Wraps another library and records the calls made through it.
///
/// Live values are tracked by address, so the wrapper can tell a legitimate
/// `clear` from a double free. Offending calls are recorded as violations and
/// are *not* forwarded, which keeps the wrapped library free of undefined
/// behaviour while a test inspects what went wrong.
pub struct RecordingLibrary<L: MpfrLibrary = SoftMpfr> {
    inner: L,
    calls: Mutex<Vec<NativeCall>>,
    live: Mutex<HashSet<usize>>,
    violations: Mutex<Vec<Violation>>,
    peak_live: AtomicUsize,
}

impl<L: MpfrLibrary> RecordingLibrary<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            live: Mutex::new(HashSet::new()),
            violations: Mutex::new(Vec::new()),
            peak_live: AtomicUsize::new(0),
        }
    }

    /// The wrapped library.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Snapshot of every call recorded so far, in order.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&NativeCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| predicate(*c)).count()
    }

    /// Number of `init` + `init2` calls.
    pub fn init_count(&self) -> usize {
        self.count(NativeCall::is_init)
    }

    /// Number of `clear` calls.
    pub fn clear_count(&self) -> usize {
        self.count(|c| *c == NativeCall::Clear)
    }

    /// Values initialized and not yet cleared.
    pub fn live_values(&self) -> usize {
        self.live.lock().len()
    }

    /// Highest number of simultaneously live values seen.
    pub fn peak_live_values(&self) -> usize {
        self.peak_live.load(Ordering::Relaxed)
    }

    /// Contract breaches observed so far.
    pub fn violations(&self) -> Vec<Violation> {
        self.violations.lock().clone()
    }

    /// True when no violation has been observed.
    pub fn is_balanced(&self) -> bool {
        self.violations.lock().is_empty()
    }

    /// Forget recorded calls and violations. Live tracking is kept.
    pub fn reset(&self) {
        self.calls.lock().clear();
        self.violations.lock().clear();
    }

    fn record(&self, call: NativeCall) {
        self.calls.lock().push(call);
    }

    fn violate(&self, violation: Violation) {
        tracing::warn!(?violation, backend = self.inner.name(), "native contract violation");
        self.violations.lock().push(violation);
    }

    /// Marks `x` live; returns false if it already was.
    fn mark_live(&self, x: *mut MpfrStruct) -> bool {
        let mut live = self.live.lock();
        let inserted = live.insert(x as usize);
        self.peak_live.fetch_max(live.len(), Ordering::Relaxed);
        inserted
    }

    fn is_live(&self, x: *const MpfrStruct) -> bool {
        self.live.lock().contains(&(x as usize))
    }
}

impl<L: MpfrLibrary + Default> Default for RecordingLibrary<L> {
    fn default() -> Self {
        Self::new(L::default())
    }
}

impl<L: MpfrLibrary> MpfrLibrary for RecordingLibrary<L> {
    unsafe fn init(&self, x: *mut MpfrStruct) {
        self.record(NativeCall::Init);
        if !self.mark_live(x) {
            self.violate(Violation::DoubleInit);
            return;
        }
        self.inner.init(x);
    }

    unsafe fn init2(&self, x: *mut MpfrStruct, prec: PrecT) {
        self.record(NativeCall::Init2(prec));
        if !self.mark_live(x) {
            self.violate(Violation::DoubleInit);
            return;
        }
        self.inner.init2(x, prec);
    }

    unsafe fn clear(&self, x: *mut MpfrStruct) {
        self.record(NativeCall::Clear);
        if !self.live.lock().remove(&(x as usize)) {
            self.violate(Violation::ClearWithoutInit);
            return;
        }
        self.inner.clear(x);
    }

    unsafe fn set_default_prec(&self, prec: PrecT) {
        self.record(NativeCall::SetDefaultPrec(prec));
        self.inner.set_default_prec(prec);
    }

    fn get_default_prec(&self) -> PrecT {
        self.record(NativeCall::GetDefaultPrec);
        self.inner.get_default_prec()
    }

    unsafe fn set_prec(&self, x: *mut MpfrStruct, prec: PrecT) {
        self.record(NativeCall::SetPrec(prec));
        if !self.is_live(x) {
            self.violate(Violation::AccessWithoutInit);
            return;
        }
        self.inner.set_prec(x, prec);
    }

    unsafe fn get_prec(&self, x: *const MpfrStruct) -> PrecT {
        self.record(NativeCall::GetPrec);
        if !self.is_live(x) {
            self.violate(Violation::AccessWithoutInit);
            return 0;
        }
        self.inner.get_prec(x)
    }

    fn default_slot(&self) -> &Mutex<()> {
        self.inner.default_slot()
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

impl<L: MpfrLibrary> std::fmt::Debug for RecordingLibrary<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingLibrary")
            .field("inner", &self.inner.name())
            .field("calls", &self.calls.lock().len())
            .field("live", &self.live_values())
            .finish()
    }
}
