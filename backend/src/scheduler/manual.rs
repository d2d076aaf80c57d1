//! Manually driven scheduler
//!
//! Keeps registrations in memory and reports how many periods are due when
//! the owner feeds it elapsed time. Cloning shares the same registrations,
//! so a driver can hand one clone to the engine and keep another to poll.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ScheduleError, ScheduleHandle, Scheduler};

/// One call the engine made against the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCall {
    Schedule {
        handle: ScheduleHandle,
        period_ms: u64,
    },
    Cancel {
        handle: ScheduleHandle,
    },
}

#[derive(Debug, Default)]
struct Registry {
    next_handle: u64,
    /// Active registration: handle, period, and time accumulated toward the next period
    active: Option<(ScheduleHandle, u64, u64)>,
    calls: Vec<SchedulerCall>,
}

/// Single-threaded scheduler driven by explicit elapsed time
///
/// # Example
/// ```
/// use pizza_shop_core_rs::scheduler::{ManualScheduler, Scheduler};
///
/// let driver = ManualScheduler::new();
/// let mut engine_side = driver.clone();
///
/// let handle = engine_side.schedule(100).unwrap();
/// assert_eq!(driver.advance(250), 2);
/// assert_eq!(driver.advance(50), 1);
///
/// engine_side.cancel(handle);
/// assert_eq!(driver.advance(1_000), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    registry: Rc<RefCell<Registry>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `elapsed_ms` of time and return how many ticks fell due
    ///
    /// Returns 0 when nothing is registered. Leftover time carries over to
    /// the next call.
    pub fn advance(&self, elapsed_ms: u64) -> u64 {
        let mut registry = self.registry.borrow_mut();
        match registry.active.as_mut() {
            Some((_, period_ms, accumulated)) => {
                *accumulated = accumulated.saturating_add(elapsed_ms);
                let due = *accumulated / *period_ms;
                *accumulated %= *period_ms;
                due
            }
            None => 0,
        }
    }

    /// Active registration and its period, if any
    pub fn active(&self) -> Option<(ScheduleHandle, u64)> {
        self.registry
            .borrow()
            .active
            .map(|(handle, period_ms, _)| (handle, period_ms))
    }

    /// Period of the active registration
    pub fn period_ms(&self) -> Option<u64> {
        self.active().map(|(_, period_ms)| period_ms)
    }

    pub fn is_active(&self) -> bool {
        self.registry.borrow().active.is_some()
    }

    /// Every schedule/cancel call received, oldest first
    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.registry.borrow().calls.clone()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, period_ms: u64) -> Result<ScheduleHandle, ScheduleError> {
        let mut registry = self.registry.borrow_mut();
        registry.next_handle += 1;
        let handle = ScheduleHandle(registry.next_handle);

        // A zero period would report infinitely many due ticks
        let period_ms = period_ms.max(1);
        registry.active = Some((handle, period_ms, 0));
        registry.calls.push(SchedulerCall::Schedule { handle, period_ms });
        Ok(handle)
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        let mut registry = self.registry.borrow_mut();
        if matches!(registry.active, Some((active, _, _)) if active == handle) {
            registry.active = None;
        }
        registry.calls.push(SchedulerCall::Cancel { handle });
    }
}
