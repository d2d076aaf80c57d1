//! Pizza Shop Core - Rust Engine
//!
//! Time-stepped pizza shop economy driven by an external scheduler, with a
//! snapshot emitted to the driver after every state change.
//!
//! # Architecture
//!
//! - **core**: Tick clock
//! - **models**: Domain types (customers, cars, worker, events)
//! - **orchestrator**: Engine, configuration, snapshots
//! - **scheduler**: Periodic tick registration capability
//! - **rng**: Injectable random sources
//!
//! # Critical Invariants
//!
//! 1. Reputation stays within its configured bounds after every mutation
//! 2. Pizzas and ingredients never go negative
//! 3. At most one worker trip is in flight
//! 4. All randomness goes through an injected `RandomSource`

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod scheduler;

// Re-exports for convenience
pub use crate::core::time::TickClock;
pub use models::{
    car::{CarCatalog, CarSpec},
    customer::{Customer, CustomerQueue},
    event::{Event, EventLog},
    worker::WorkerState,
};
pub use orchestrator::{
    CommandError, ConfigError, EngineConfig, NoopSink, SimulationEngine, SinkError, Snapshot,
    SnapshotSink, Spend, MAX_ARRIVALS_PER_TICK,
};
pub use rng::{RandomSource, RngManager, ScriptedRng};
pub use scheduler::{ManualScheduler, ScheduleError, ScheduleHandle, Scheduler, SchedulerCall};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn pizza_shop_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::shop::PyPizzaShop>()?;
    Ok(())
}
