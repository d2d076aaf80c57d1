//! Tick scheduling capability
//!
//! The engine never owns a platform timer. It asks a [`Scheduler`] to
//! register a periodic tick and cancels the registration when it stops.
//! Whoever owns the scheduler (a UI loop, the CLI, a Python host) calls
//! [`SimulationEngine::step`](crate::SimulationEngine::step) once per
//! elapsed period of the active registration.
//!
//! # Critical Invariants
//!
//! 1. **No double scheduling**: the engine cancels its old handle before
//!    scheduling a new one
//! 2. **Cancel is final**: no period of a cancelled registration may be
//!    reported as due afterwards

mod manual;

pub use manual::{ManualScheduler, SchedulerCall};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of one periodic registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleHandle(pub u64);

/// Registration failures reported by a [`Scheduler`]
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Scheduler rejected the registration: {0}")]
    Rejected(String),
}

/// External "run every N milliseconds, cancelable" capability
pub trait Scheduler {
    /// Register a periodic tick every `period_ms` milliseconds
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] when no registration was made. Nothing is
    /// left to cancel in that case.
    fn schedule(&mut self, period_ms: u64) -> Result<ScheduleHandle, ScheduleError>;

    /// Cancel a registration; unknown or already cancelled handles are ignored
    fn cancel(&mut self, handle: ScheduleHandle);
}
