// ============================================================================
// Handle State Machine
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a handle currently owns a native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandleState {
    Uninitialized = 0,
    Live = 1,
}

/// Lifecycle operations on a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleTransition {
    /// Allocate a native value (re-entrant: releases a live one first)
    Construct,
    /// Give the native value back to the library; idempotent
    Release,
}

/// Native calls a transition implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEffect {
    pub clear: bool,
    pub init: bool,
}

impl HandleState {
    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self, HandleState::Live)
    }

    /// Resulting state and the native calls needed to get there.
    ///
    /// Every transition is defined: construction over a live value clears it
    /// first, and releasing an uninitialized handle does nothing. This table
    /// is what keeps clears and inits paired one to one.
    pub fn transition(&self, transition: HandleTransition) -> (HandleState, TransitionEffect) {
        match (self, transition) {
            (HandleState::Uninitialized, HandleTransition::Construct) => (
                HandleState::Live,
                TransitionEffect {
                    clear: false,
                    init: true,
                },
            ),
            (HandleState::Live, HandleTransition::Construct) => (
                HandleState::Live,
                TransitionEffect {
                    clear: true,
                    init: true,
                },
            ),
            (HandleState::Live, HandleTransition::Release) => (
                HandleState::Uninitialized,
                TransitionEffect {
                    clear: true,
                    init: false,
                },
            ),
            (HandleState::Uninitialized, HandleTransition::Release) => (
                HandleState::Uninitialized,
                TransitionEffect {
                    clear: false,
                    init: false,
                },
            ),
        }
    }
}
