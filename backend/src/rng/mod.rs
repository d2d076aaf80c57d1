//! Deterministic random number generation
//!
//! All randomness in the engine goes through the [`RandomSource`] trait so
//! that drivers can seed it and tests can script it. The default source is
//! the xorshift64* [`RngManager`].

mod scripted;
mod xorshift;

pub use scripted::ScriptedRng;
pub use xorshift::RngManager;

/// Source of uniformly distributed integers
///
/// Implementations must be uniform over the closed range `[min, max]`.
pub trait RandomSource {
    /// Draw an integer in `[min, max]` (both inclusive)
    fn int_inclusive(&mut self, min: i64, max: i64) -> i64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        (**self).int_inclusive(min, max)
    }
}
