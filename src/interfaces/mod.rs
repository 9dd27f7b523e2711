// ============================================================================
// Interfaces Module
// Contains the contract with the native numeric library
// ============================================================================

mod native_library;

pub use native_library::MpfrLibrary;
