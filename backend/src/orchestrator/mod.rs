//! Orchestrator - the shop's tick loop and command surface
//!
//! See `engine.rs` for the full implementation.

pub mod config;
pub mod engine;
pub mod snapshot;


// Re-export main types for convenience
pub use config::{ConfigError, EngineConfig, MAX_ARRIVALS_PER_TICK};
pub use engine::{CommandError, SimulationEngine, Spend};
pub use snapshot::{NoopSink, SinkError, Snapshot, SnapshotSink};
