//! Shared helpers for engine integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use pizza_shop_core_rs::{
    EngineConfig, ManualScheduler, ScriptedRng, SimulationEngine, SinkError, Snapshot,
};

/// Snapshots received by a recording sink, shared with the test body
#[derive(Clone, Default)]
pub struct Recorded(pub Rc<RefCell<Vec<Snapshot>>>);

impl Recorded {
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn last(&self) -> Snapshot {
        self.0
            .borrow()
            .last()
            .cloned()
            .expect("no snapshot recorded")
    }

    pub fn all(&self) -> Vec<Snapshot> {
        self.0.borrow().clone()
    }

    pub fn messages(&self) -> Vec<Option<String>> {
        self.0
            .borrow()
            .iter()
            .map(|s| s.last_message.clone())
            .collect()
    }
}

/// Engine with scripted randomness, a manual scheduler and a recording sink
pub fn engine_with(
    config: EngineConfig,
    rng: ScriptedRng,
) -> (SimulationEngine, ManualScheduler, Recorded) {
    let scheduler = ManualScheduler::new();
    let recorded = Recorded::default();
    let sink_log = recorded.0.clone();

    let engine = SimulationEngine::new(config)
        .unwrap()
        .with_scheduler(scheduler.clone())
        .with_rng(rng)
        .with_sink(move |snapshot: &Snapshot| -> Result<(), SinkError> {
            sink_log.borrow_mut().push(snapshot.clone());
            Ok(())
        });

    (engine, scheduler, recorded)
}

/// Default game where every random draw is its lower bound
///
/// One customer arrives per tick and the price re-rolls to 100.
pub fn quiet_engine() -> (SimulationEngine, ManualScheduler, Recorded) {
    engine_with(EngineConfig::default(), ScriptedRng::always_min())
}

pub fn config_with_money(money: f64) -> EngineConfig {
    EngineConfig {
        initial_money: money,
        ..Default::default()
    }
}
