// ============================================================================
// Handle Lifecycle Example
// ============================================================================
//
// Run with `cargo run --example lifecycle --features logging` to see the
// lifecycle events logged by the library.

use bigfloat_core::native::NativeCall;
use bigfloat_core::prelude::*;
use std::sync::Arc;

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== BigFloat Handle Lifecycle ===\n");
    println!("Precision bounds: [{}, {}]", PREC_MIN, PREC_MAX);

    // Instrumented library so the native calls can be shown afterwards
    let policy = Arc::new(PrecisionPolicy::new(RecordingLibrary::new(SoftMpfr::new())));
    println!("Library default precision: {}", policy.default_precision());

    PrecisionConfig::quadruple()
        .with_label("demo")
        .apply(&policy)
        .expect("preset precision is in range");
    println!("Default precision after config: {}\n", policy.default_precision());

    let mut x = MpfrHandle::with_policy(Arc::clone(&policy), None).expect("default construction");
    let mut y = MpfrHandle::with_policy(Arc::clone(&policy), Some(53)).expect("explicit 53");
    println!("x: {:?}", x);
    println!("y: {:?}", y);

    match y.set_precision(1) {
        Ok(()) => println!("unexpected: precision 1 accepted"),
        Err(err) => println!("set_precision(1) rejected: {}", err),
    }

    y.set_precision(24).expect("24 is in range");
    println!("y after set_precision(24): {:?}", y);

    x.reinit(Some(256)).expect("256 is in range");
    println!("x after reinit(256): {:?}", x);

    x.release();
    x.release();
    println!("x after two releases: {:?}", x);

    drop(x);
    drop(y);

    let lib = policy.library();
    println!("\n=== Native Calls ===");
    for call in lib.calls() {
        if call != NativeCall::GetPrec {
            println!("  {:?}", call);
        }
    }
    println!("\ninit: {}, clear: {}", lib.init_count(), lib.clear_count());
    println!("live values: {}", lib.live_values());
    println!("violations: {:?}", lib.violations());
}
