//! Snapshots and the sink they are published to
//!
//! After every state change the engine builds an immutable [`Snapshot`] and
//! hands it to the driver's [`SnapshotSink`]. The field set is fixed: every
//! snapshot carries every field, with `null` for absent cars or messages.

use serde::Serialize;
use thiserror::Error;

use crate::models::car::CarSpec;
use crate::models::worker::WorkerState;

/// Immutable view of the shop after one state change
///
/// Serializes with the camelCase field names the UI expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tick: u64,
    pub pizzas: u64,

    /// Number of customers waiting
    pub customers: usize,

    pub ingredients: u64,
    pub ingredient_price: f64,
    pub worker: WorkerState,
    pub current_car: Option<CarSpec>,
    pub next_car: Option<CarSpec>,
    pub money: f64,
    pub reputation: f64,
    pub interval_ms: u64,

    /// Event text for this emission, `None` when nothing noteworthy happened
    pub last_message: Option<String>,
}

/// Errors a sink may report; the engine logs and discards them
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink rejected snapshot: {0}")]
    Rejected(String),

    #[error("Sink disconnected")]
    Disconnected,

    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Receiver of engine snapshots
///
/// Any `FnMut(&Snapshot) -> Result<(), SinkError>` closure is a sink.
///
/// # Example
/// ```
/// use pizza_shop_core_rs::{EngineConfig, SimulationEngine, Snapshot, SinkError};
///
/// let mut engine = SimulationEngine::new(EngineConfig::default())
///     .unwrap()
///     .with_sink(|snapshot: &Snapshot| -> Result<(), SinkError> {
///         assert!(snapshot.reputation <= 200.0);
///         Ok(())
///     });
/// engine.step();
/// ```
pub trait SnapshotSink {
    fn publish(&mut self, snapshot: &Snapshot) -> Result<(), SinkError>;
}

impl<F> SnapshotSink for F
where
    F: FnMut(&Snapshot) -> Result<(), SinkError>,
{
    fn publish(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self(snapshot)
    }
}

/// Sink that discards every snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SnapshotSink for NoopSink {
    fn publish(&mut self, _snapshot: &Snapshot) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            tick: 3,
            pizzas: 0,
            customers: 2,
            ingredients: 176,
            ingredient_price: 150.0,
            worker: WorkerState::default(),
            current_car: None,
            next_car: None,
            money: 8.0,
            reputation: 100.1,
            interval_ms: 2000,
            last_message: None,
        }
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "currentCar",
                "customers",
                "ingredientPrice",
                "ingredients",
                "intervalMs",
                "lastMessage",
                "money",
                "nextCar",
                "pizzas",
                "reputation",
                "tick",
                "worker",
            ]
        );
        assert!(json["lastMessage"].is_null());
        assert_eq!(json["worker"]["fetching"], false);
    }
}
