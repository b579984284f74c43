//! Structural invariant checks for grid-sized state.
//!
//! The mesh and the diffusion operator both hold several parallel arrays
//! whose lengths are tied to the point count or the segment length. The
//! checks here are cheap enough to run after every structural change in
//! debug builds; release builds opt in through the `strict-invariants` or
//! `check-invariants` features.

use crate::grid_error::GridError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), GridError>;

    /// Panic on the first violated invariant when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "grid state");
    }
}

/// Run a fallible check and panic on error when invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Compare an array length against the size it must match.
#[inline]
pub(crate) fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), GridError> {
    if expected == found {
        Ok(())
    } else {
        Err(GridError::DimensionMismatch {
            what,
            expected,
            found,
        })
    }
}
