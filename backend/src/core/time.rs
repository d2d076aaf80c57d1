//! Time management for the simulation
//!
//! The shop operates in discrete ticks. Every time-based effect (customer
//! patience, worker trips, ingredient price changes) is counted in ticks,
//! never in wall-clock time.

use serde::{Deserialize, Serialize};

/// Monotonic tick counter
///
/// # Example
/// ```
/// use pizza_shop_core_rs::TickClock;
///
/// let mut clock = TickClock::new();
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance_tick();
/// assert_eq!(clock.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickClock {
    /// Total ticks elapsed since start (or since the last reset)
    current_tick: u64,
}

impl TickClock {
    /// Create a clock at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Advance time by one tick and return the new tick
    ///
    /// # Example
    /// ```
    /// use pizza_shop_core_rs::TickClock;
    ///
    /// let mut clock = TickClock::new();
    /// assert_eq!(clock.advance_tick(), 1);
    /// assert_eq!(clock.advance_tick(), 2);
    /// ```
    pub fn advance_tick(&mut self) -> u64 {
        self.current_tick += 1;
        self.current_tick
    }

    /// Get the current tick
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// True when the current tick is a positive multiple of `period`
    ///
    /// Tick 0 never matches, so a fresh clock does not trigger periodic
    /// effects before the first step.
    ///
    /// # Example
    /// ```
    /// use pizza_shop_core_rs::TickClock;
    ///
    /// let mut clock = TickClock::new();
    /// for _ in 0..5 {
    ///     clock.advance_tick();
    /// }
    /// assert!(clock.is_every(5));
    /// assert!(!clock.is_every(3));
    /// ```
    pub fn is_every(&self, period: u64) -> bool {
        period > 0 && self.current_tick > 0 && self.current_tick % period == 0
    }

    /// Rewind to tick 0
    pub fn reset(&mut self) {
        self.current_tick = 0;
    }
}
