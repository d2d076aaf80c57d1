//! Event logging for replay and inspection
//!
//! Every state change the engine makes is recorded as an [`Event`]. The log
//! lets drivers and tests answer "what happened at tick N" without diffing
//! snapshots. The log keeps a bounded window of the most recent events;
//! once full, each new event evicts the oldest one.
//!
//! # Example
//!
//! ```rust
//! use pizza_shop_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::CustomerArrived { tick: 3, customer_id: 7 });
//!
//! assert_eq!(log.events_at_tick(3).len(), 1);
//! assert_eq!(log.events().next().unwrap().event_type(), "CustomerArrived");
//! ```

use std::collections::VecDeque;

use serde::Serialize;

/// Events retained by [`EventLog::new`]
pub const DEFAULT_EVENT_CAPACITY: usize = 10_000;

/// Simulation event capturing a state change
///
/// All events carry the tick at which they happened. Events are logged in
/// the order they occur within a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// New customer joined the tail of the queue
    CustomerArrived { tick: u64, customer_id: u64 },

    /// Customer received a pizza and paid
    CustomerServed {
        tick: u64,
        customer_id: u64,
        waited: u32,
        revenue: f64,
    },

    /// Customer ran out of patience and left
    CustomerLeft { tick: u64, customer_id: u64 },

    /// Ingredients turned into one pizza
    PizzaMade { tick: u64, ingredients_used: u64 },

    /// Worker left to buy ingredients
    WorkerDispatched {
        tick: u64,
        car_id: String,
        cost: f64,
        return_ticks: u32,
    },

    /// Worker came back with ingredients
    WorkerReturned {
        tick: u64,
        car_id: String,
        ingredients: u64,
    },

    /// Ingredient trip price was re-rolled
    IngredientPriceChanged { tick: u64, old_price: f64, new_price: f64 },

    /// Owned car replaced by a purchase
    CarPurchased {
        tick: u64,
        car_id: String,
        previous_car_id: String,
        price: f64,
    },

    /// Player command refused; state unchanged
    CommandRejected {
        tick: u64,
        command: String,
        reason: String,
    },

    /// Tick period changed
    IntervalChanged { tick: u64, interval_ms: u64 },

    /// Scheduling started
    Started { tick: u64, interval_ms: u64 },

    /// Scheduling stopped
    Stopped { tick: u64 },

    /// Scheduler refused a registration; the engine is not running
    ScheduleFailed { tick: u64, reason: String },

    /// Economic state reset
    Reset { tick: u64 },
}

impl Event {
    /// Tick at which the event happened
    pub fn tick(&self) -> u64 {
        match self {
            Event::CustomerArrived { tick, .. }
            | Event::CustomerServed { tick, .. }
            | Event::CustomerLeft { tick, .. }
            | Event::PizzaMade { tick, .. }
            | Event::WorkerDispatched { tick, .. }
            | Event::WorkerReturned { tick, .. }
            | Event::IngredientPriceChanged { tick, .. }
            | Event::CarPurchased { tick, .. }
            | Event::CommandRejected { tick, .. }
            | Event::IntervalChanged { tick, .. }
            | Event::Started { tick, .. }
            | Event::Stopped { tick }
            | Event::ScheduleFailed { tick, .. }
            | Event::Reset { tick } => *tick,
        }
    }

    /// Variant name, used for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::CustomerArrived { .. } => "CustomerArrived",
            Event::CustomerServed { .. } => "CustomerServed",
            Event::CustomerLeft { .. } => "CustomerLeft",
            Event::PizzaMade { .. } => "PizzaMade",
            Event::WorkerDispatched { .. } => "WorkerDispatched",
            Event::WorkerReturned { .. } => "WorkerReturned",
            Event::IngredientPriceChanged { .. } => "IngredientPriceChanged",
            Event::CarPurchased { .. } => "CarPurchased",
            Event::CommandRejected { .. } => "CommandRejected",
            Event::IntervalChanged { .. } => "IntervalChanged",
            Event::Started { .. } => "Started",
            Event::Stopped { .. } => "Stopped",
            Event::ScheduleFailed { .. } => "ScheduleFailed",
            Event::Reset { .. } => "Reset",
        }
    }

    /// Customer the event concerns, if any
    pub fn customer_id(&self) -> Option<u64> {
        match self {
            Event::CustomerArrived { customer_id, .. }
            | Event::CustomerServed { customer_id, .. }
            | Event::CustomerLeft { customer_id, .. } => Some(*customer_id),
            _ => None,
        }
    }
}

/// In-memory history of the most recent events
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
    /// Events evicted since the last clear
    evicted: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Log retaining at most `capacity` events (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            evicted: 0,
        }
    }

    /// Append an event, evicting the oldest when full
    pub fn log(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
        self.events.push_back(event);
    }

    /// Retained events, oldest first
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &Event> + ExactSizeIterator {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many events were evicted to stay within capacity
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: u64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get the full history of one customer
    pub fn events_for_customer(&self, customer_id: u64) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.customer_id() == Some(customer_id))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
        self.evicted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tick() {
        let event = Event::WorkerReturned {
            tick: 42,
            car_id: "fiat".to_string(),
            ingredients: 100,
        };

        assert_eq!(event.tick(), 42);
        assert_eq!(event.event_type(), "WorkerReturned");
        assert_eq!(event.customer_id(), None);
    }

    #[test]
    fn test_event_log_query_by_customer() {
        let mut log = EventLog::new();

        log.log(Event::CustomerArrived {
            tick: 1,
            customer_id: 1,
        });
        log.log(Event::CustomerArrived {
            tick: 1,
            customer_id: 2,
        });
        log.log(Event::CustomerServed {
            tick: 2,
            customer_id: 1,
            waited: 1,
            revenue: 8.0,
        });

        assert_eq!(log.events_for_customer(1).len(), 2);
        assert_eq!(log.events_for_customer(2).len(), 1);
        assert_eq!(log.events_of_type("CustomerArrived").len(), 2);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = Event::Stopped { tick: 9 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Stopped");
        assert_eq!(json["tick"], 9);
    }

    #[test]
    fn test_event_log_clear() {
        let mut log = EventLog::new();
        log.log(Event::Reset { tick: 0 });
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_full_log_evicts_oldest() {
        let mut log = EventLog::with_capacity(3);
        for tick in 1..=5 {
            log.log(Event::Stopped { tick });
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.evicted(), 2);
        let ticks: Vec<u64> = log.events().map(Event::tick).collect();
        assert_eq!(ticks, vec![3, 4, 5]);
    }

    #[test]
    fn test_zero_capacity_keeps_latest_event() {
        let mut log = EventLog::with_capacity(0);
        log.log(Event::Stopped { tick: 1 });
        log.log(Event::Reset { tick: 0 });

        assert_eq!(log.capacity(), 1);
        assert_eq!(log.events().next().map(Event::event_type), Some("Reset"));
    }
}
