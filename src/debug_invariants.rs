//! Invariant checking hooks.
//!
//! Structures that carry cross-referencing tables implement [`DebugInvariants`]
//! so that mutating operations can re-check themselves after every call. The
//! checks are compiled in under `debug_assertions` and in release builds with
//! the `check-invariants` or `strict-invariants` features.

use crate::mesh_error::MeshError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshError>;

    /// Assert invariants in debug builds or when invariant checking is enabled.
    ///
    /// # Panics
    /// When checking is enabled and [`validate_invariants`](Self::validate_invariants)
    /// reports an error.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "tissue");
    }
}

/// Run a fallible check and panic on error when invariant checking is
/// enabled. The trailing tokens are a string literal naming the context.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
