//! Python bindings
//!
//! Exposes the engine to a Python UI as `PizzaShop`. Snapshots cross the
//! boundary as plain dicts.

pub mod shop;
pub mod types;
