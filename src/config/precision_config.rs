// ============================================================================
// Precision Configuration
// Declarative default-precision settings applied to a policy
// ============================================================================

use crate::interfaces::MpfrLibrary;
use crate::precision::{validate_precision, Precision, PrecisionPolicy, PrecisionResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Significand widths of the common binary formats, in bits.
///
/// Only the widths are borrowed; no exponent range or subnormal behaviour is
/// implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrecisionPreset {
    /// binary32 significand (24 bits)
    Single,
    /// binary64 significand (53 bits)
    Double,
    /// x87 extended significand (64 bits)
    Extended,
    /// binary128 significand (113 bits)
    Quadruple,
}

impl PrecisionPreset {
    pub const fn bits(self) -> Precision {
        match self {
            PrecisionPreset::Single => 24,
            PrecisionPreset::Double => 53,
            PrecisionPreset::Extended => 64,
            PrecisionPreset::Quadruple => 113,
        }
    }
}

/// Configuration for the default precision of a [`PrecisionPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionConfig {
    /// Precision handed to handles constructed without one
    pub default_precision: Precision,

    /// Optional label for logs (e.g. the subsystem that owns this config)
    pub label: Option<String>,
}

impl PrecisionConfig {
    /// Create a configuration with the given default precision
    pub fn new(default_precision: Precision) -> Self {
        Self {
            default_precision,
            label: None,
        }
    }

    /// Builder method: Set the default precision
    pub fn with_default_precision(mut self, precision: Precision) -> Self {
        self.default_precision = precision;
        self
    }

    /// Builder method: Set the log label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> PrecisionResult<()> {
        validate_precision(self.default_precision)
    }

    /// Validate, then push the default precision into `policy`.
    pub fn apply<L: MpfrLibrary>(&self, policy: &PrecisionPolicy<L>) -> PrecisionResult<()> {
        self.validate()?;
        policy.set_default_precision(self.default_precision)?;
        tracing::debug!(
            label = self.label.as_deref().unwrap_or("-"),
            precision = self.default_precision,
            "precision config applied"
        );
        Ok(())
    }
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self::double()
    }
}

impl From<PrecisionPreset> for PrecisionConfig {
    fn from(preset: PrecisionPreset) -> Self {
        Self::new(preset.bits())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl PrecisionConfig {
    /// 24-bit default, as binary32
    pub fn single() -> Self {
        PrecisionPreset::Single.into()
    }

    /// 53-bit default, as binary64 (also the native library's own default)
    pub fn double() -> Self {
        PrecisionPreset::Double.into()
    }

    /// 64-bit default, as the x87 extended format
    pub fn extended() -> Self {
        PrecisionPreset::Extended.into()
    }

    /// 113-bit default, as binary128
    pub fn quadruple() -> Self {
        PrecisionPreset::Quadruple.into()
    }
}
