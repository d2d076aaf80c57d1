//! PyO3 wrapper for SimulationEngine

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_engine_config, snapshot_to_py, PyScheduler, PySink};
use crate::orchestrator::SimulationEngine;

/// Python wrapper for the engine
///
/// # Example (from Python)
///
/// ```python
/// from pizza_shop_core_rs import PizzaShop
///
/// shop = PizzaShop({"rng_seed": 7}, on_update=print)
/// shop.make_pizza()
/// state = shop.step()
/// print(state["customers"], state["lastMessage"])
/// ```
#[pyclass(name = "PizzaShop", unsendable)]
pub struct PyPizzaShop {
    inner: SimulationEngine,
}

fn to_py_error(message: String) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(message)
}

#[pymethods]
impl PyPizzaShop {
    /// Create a shop
    ///
    /// * `config` - optional dict of `EngineConfig` overrides
    /// * `on_update` - optional callable receiving every snapshot dict
    /// * `scheduler` - optional object with `schedule(period_ms)` and `cancel(handle)`
    #[new]
    #[pyo3(signature = (config=None, on_update=None, scheduler=None))]
    fn new(
        config: Option<&Bound<'_, PyDict>>,
        on_update: Option<Py<PyAny>>,
        scheduler: Option<Py<PyAny>>,
    ) -> PyResult<Self> {
        let rust_config = parse_engine_config(config)?;
        let mut inner =
            SimulationEngine::new(rust_config).map_err(|e| to_py_error(e.to_string()))?;

        if let Some(callback) = on_update {
            inner = inner.with_sink(PySink::new(callback));
        }
        if let Some(target) = scheduler {
            inner = inner.with_scheduler(PyScheduler::new(target));
        }

        Ok(Self { inner })
    }

    /// Advance one tick and return the snapshot
    fn step(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let snapshot = self.inner.step();
        Ok(snapshot_to_py(py, &snapshot)?.unbind())
    }

    /// True when ticking began; false if already running or the scheduler refused
    fn start(&mut self) -> bool {
        self.inner.start().is_some() && self.inner.is_running()
    }

    fn stop(&mut self) -> bool {
        self.inner.stop().is_some()
    }

    fn set_interval_ms(&mut self, interval_ms: u64) -> u64 {
        self.inner.set_interval_ms(interval_ms).interval_ms
    }

    fn make_pizza(&mut self) -> bool {
        self.inner.make_pizza()
    }

    fn send_worker(&mut self) -> bool {
        self.inner.send_worker()
    }

    fn buy_car(&mut self, car_id: &str) -> bool {
        self.inner.buy_car(car_id)
    }

    fn reset(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let snapshot = self.inner.reset();
        Ok(snapshot_to_py(py, &snapshot)?.unbind())
    }

    /// Current state without emitting to `on_update`
    fn snapshot(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        Ok(snapshot_to_py(py, &self.inner.snapshot())?.unbind())
    }

    fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    fn current_tick(&self) -> u64 {
        self.inner.current_tick()
    }
}
