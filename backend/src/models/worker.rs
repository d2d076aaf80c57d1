//! Worker dispatch state
//!
//! The shop has a single worker. A dispatch is paid up front and returns a
//! fixed number of ticks later; at most one dispatch is ever in flight.

use serde::{Deserialize, Serialize};

/// Outstanding ingredient trip, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerState {
    /// True while a trip is in progress
    pub fetching: bool,

    /// Ticks until the worker is back
    pub remaining: u32,
}

impl WorkerState {
    /// Start a trip lasting `ticks`
    ///
    /// Callers must check [`WorkerState::fetching`] first.
    pub fn dispatch(&mut self, ticks: u32) {
        debug_assert!(!self.fetching, "worker already dispatched");
        self.fetching = true;
        self.remaining = ticks;
    }

    /// Count one tick off the current trip
    ///
    /// Returns `true` on the tick the worker returns.
    ///
    /// # Example
    /// ```
    /// use pizza_shop_core_rs::WorkerState;
    ///
    /// let mut worker = WorkerState::default();
    /// worker.dispatch(2);
    /// assert!(!worker.tick_down());
    /// assert!(worker.tick_down());
    /// assert!(!worker.fetching);
    /// ```
    pub fn tick_down(&mut self) -> bool {
        if !self.fetching {
            return false;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fetching = false;
            return true;
        }
        false
    }
}
