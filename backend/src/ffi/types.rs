//! Type conversion utilities for FFI boundary
//!
//! Converts between engine types and Python objects, and adapts Python
//! callables to the engine's sink and scheduler traits.

use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing::warn;

use crate::models::car::CarSpec;
use crate::orchestrator::{EngineConfig, SinkError, Snapshot, SnapshotSink};
use crate::scheduler::{ScheduleError, ScheduleHandle, Scheduler};

/// Parse an optional Python dict into an [`EngineConfig`]
///
/// The dict goes through Python's `json` module so it is validated by the
/// same serde definitions as config files.
pub fn parse_engine_config(config: Option<&Bound<'_, PyDict>>) -> PyResult<EngineConfig> {
    let Some(config) = config else {
        return Ok(EngineConfig::default());
    };

    let json: String = config
        .py()
        .import_bound("json")?
        .call_method1("dumps", (config,))?
        .extract()?;

    EngineConfig::from_json_str(&json)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
}

fn car_to_py<'py>(py: Python<'py>, car: &CarSpec) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("id", &car.id)?;
    dict.set_item("name", &car.name)?;
    dict.set_item("size", car.ingredient_yield)?;
    dict.set_item("speed", car.return_ticks)?;
    dict.set_item("price", car.price)?;
    dict.set_item("unlockTick", car.unlock_tick)?;
    Ok(dict)
}

/// Convert a snapshot to the dict shape the UI consumes
pub fn snapshot_to_py<'py>(py: Python<'py>, snapshot: &Snapshot) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("tick", snapshot.tick)?;
    dict.set_item("pizzas", snapshot.pizzas)?;
    dict.set_item("customers", snapshot.customers)?;
    dict.set_item("ingredients", snapshot.ingredients)?;
    dict.set_item("ingredientPrice", snapshot.ingredient_price)?;

    let worker = PyDict::new_bound(py);
    worker.set_item("fetching", snapshot.worker.fetching)?;
    worker.set_item("remaining", snapshot.worker.remaining)?;
    dict.set_item("worker", worker)?;

    match &snapshot.current_car {
        Some(car) => dict.set_item("currentCar", car_to_py(py, car)?)?,
        None => dict.set_item("currentCar", py.None())?,
    }
    match &snapshot.next_car {
        Some(car) => dict.set_item("nextCar", car_to_py(py, car)?)?,
        None => dict.set_item("nextCar", py.None())?,
    }

    dict.set_item("money", snapshot.money)?;
    dict.set_item("reputation", snapshot.reputation)?;
    dict.set_item("intervalMs", snapshot.interval_ms)?;
    dict.set_item("lastMessage", snapshot.last_message.as_deref())?;
    Ok(dict)
}

/// Python callable receiving snapshot dicts
pub struct PySink {
    callback: Py<PyAny>,
}

impl PySink {
    pub fn new(callback: Py<PyAny>) -> Self {
        Self { callback }
    }
}

impl SnapshotSink for PySink {
    fn publish(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        Python::with_gil(|py| {
            let dict = snapshot_to_py(py, snapshot)?;
            self.callback.call1(py, (dict,))?;
            Ok::<(), PyErr>(())
        })
        .map_err(|e| SinkError::Rejected(e.to_string()))
    }
}

/// Python object with `schedule(period_ms) -> int` and `cancel(handle)`
pub struct PyScheduler {
    target: Py<PyAny>,
}

impl PyScheduler {
    pub fn new(target: Py<PyAny>) -> Self {
        Self { target }
    }
}

impl Scheduler for PyScheduler {
    fn schedule(&mut self, period_ms: u64) -> Result<ScheduleHandle, ScheduleError> {
        Python::with_gil(|py| {
            self.target
                .call_method1(py, "schedule", (period_ms,))
                .and_then(|handle| handle.extract::<u64>(py))
                .map(ScheduleHandle)
                .map_err(|e| ScheduleError::Rejected(e.to_string()))
        })
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        Python::with_gil(|py| {
            if let Err(e) = self.target.call_method1(py, "cancel", (handle.0,)) {
                warn!(error = %e, handle = handle.0, "python scheduler failed to cancel");
            }
        })
    }
}
