//! Domain models for the pizza shop

pub mod car;
pub mod customer;
pub mod event;
pub mod worker;

// Re-exports
pub use car::{CarCatalog, CarSpec};
pub use customer::{Customer, CustomerQueue};
pub use event::{Event, EventLog};
pub use worker::WorkerState;
