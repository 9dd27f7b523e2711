// ============================================================================
// Configuration Module
// ============================================================================

pub mod precision_config;

pub use precision_config::{PrecisionConfig, PrecisionPreset};
