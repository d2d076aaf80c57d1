//! Simulation Engine
//!
//! Owns all shop state and runs the tick loop:
//!
//! ```text
//! For each tick t:
//! 1. Advance the clock
//! 2. Admit arrivals (base + random extra + reputation bonus)
//! 3. Serve waiting customers from pizza stock (FIFO)
//! 4. Age the queue, drop customers whose patience ran out
//! 5. Summarize arrivals/departures in the message
//! 6. Clamp reputation
//! 7. Count down the worker trip, deliver ingredients on return
//! 8. Re-roll the ingredient price every `price_change_period` ticks
//! 9. Emit a snapshot
//! ```
//!
//! Player commands (`make_pizza`, `send_worker`, `buy_car`, ...) mutate
//! state synchronously and emit exactly one snapshot each, whether they
//! succeed or are rejected. A rejected command leaves state unchanged.
//!
//! # Example
//!
//! ```rust
//! use pizza_shop_core_rs::{EngineConfig, SimulationEngine};
//!
//! let mut engine = SimulationEngine::new(EngineConfig::default()).unwrap();
//!
//! assert!(engine.make_pizza());
//! assert_eq!(engine.ingredients(), 176);
//!
//! for _ in 0..10 {
//!     let snapshot = engine.step();
//!     assert!(snapshot.reputation >= 0.0 && snapshot.reputation <= 200.0);
//! }
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::time::TickClock;
use crate::models::car::CarSpec;
use crate::models::customer::CustomerQueue;
use crate::models::event::{Event, EventLog};
use crate::models::worker::WorkerState;
use crate::orchestrator::config::{ConfigError, EngineConfig};
use crate::orchestrator::snapshot::{NoopSink, Snapshot, SnapshotSink};
use crate::rng::{RandomSource, RngManager};
use crate::scheduler::{ManualScheduler, ScheduleError, ScheduleHandle, Scheduler};

// ============================================================================
// Errors
// ============================================================================

/// What a player tried to pay for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spend {
    WorkerTrip,
    Car,
}

impl fmt::Display for Spend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spend::WorkerTrip => write!(f, "to send a worker"),
            Spend::Car => write!(f, "for the car"),
        }
    }
}

/// Reasons a player command is rejected
///
/// The `Display` text is what the snapshot's `last_message` shows.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("Not enough ingredients to make pizza")]
    InsufficientIngredients { required: u64, available: u64 },

    #[error("Not enough money {spend}")]
    InsufficientFunds {
        spend: Spend,
        required: f64,
        available: f64,
    },

    #[error("Worker already fetching")]
    AlreadyFetching,

    #[error("No car available, worker cannot be dispatched")]
    NoCarAvailable,

    #[error("Car not found")]
    UnknownCar(String),

    #[error("Car already owned")]
    CarAlreadyOwned(String),

    #[error("Car not yet available")]
    CarLocked {
        car_id: String,
        unlock_tick: u64,
        tick: u64,
    },
}

// ============================================================================
// Engine
// ============================================================================

/// Pizza shop simulation engine
///
/// # Determinism
///
/// All randomness goes through the injected [`RandomSource`]. Same source
/// + same config + same command sequence = identical snapshots.
pub struct SimulationEngine {
    config: EngineConfig,

    clock: TickClock,

    /// Ready-to-serve inventory
    pizzas: u64,

    customers: CustomerQueue,

    /// Raw-material stock
    ingredients: u64,

    money: f64,

    /// Cost of the next worker trip
    ingredient_price: f64,

    reputation: f64,

    interval_ms: u64,

    worker: WorkerState,

    owned_car_id: String,

    /// Pending text for the next emission
    last_message: Option<String>,

    running: bool,

    /// Registration held while running
    schedule_handle: Option<ScheduleHandle>,

    scheduler: Box<dyn Scheduler>,

    rng: Box<dyn RandomSource>,

    sink: Box<dyn SnapshotSink>,

    event_log: EventLog,
}

impl SimulationEngine {
    /// Create an engine with a seeded RNG, a manual scheduler and a no-op sink
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let owned_car_id = config
            .cars
            .starter_car()
            .map(|car| car.id.clone())
            .ok_or(ConfigError::NoStarterCar)?;

        Ok(Self {
            clock: TickClock::new(),
            pizzas: 0,
            customers: CustomerQueue::new(),
            ingredients: config.initial_ingredients,
            money: config.initial_money,
            ingredient_price: config.initial_ingredient_price,
            reputation: config.initial_reputation,
            interval_ms: config.clamp_interval(config.interval_ms),
            worker: WorkerState::default(),
            owned_car_id,
            last_message: None,
            running: false,
            schedule_handle: None,
            scheduler: Box::new(ManualScheduler::new()),
            rng: Box::new(RngManager::new(config.rng_seed)),
            sink: Box::new(NoopSink),
            event_log: EventLog::with_capacity(config.max_logged_events),
            config,
        })
    }

    /// Replace the snapshot sink
    pub fn with_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replace the scheduler
    ///
    /// Must be called before [`SimulationEngine::start`].
    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        debug_assert!(!self.running, "scheduler swapped while running");
        self.scheduler = Box::new(scheduler);
        self
    }

    /// Replace the random source
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Begin periodic ticking
    ///
    /// No-op (and no emission) when already running. When the scheduler
    /// refuses the registration the engine stays stopped and the emitted
    /// snapshot carries the failure.
    pub fn start(&mut self) -> Option<Snapshot> {
        if self.running {
            return None;
        }

        if let Err(err) = self.register_schedule() {
            return Some(self.report_schedule_failure(err));
        }
        self.running = true;
        self.event_log.log(Event::Started {
            tick: self.clock.current_tick(),
            interval_ms: self.interval_ms,
        });
        info!(interval_ms = self.interval_ms, "simulation started");

        Some(self.notify(Some("Started".to_string())))
    }

    /// Stop periodic ticking
    ///
    /// No-op (and no emission) when not running.
    pub fn stop(&mut self) -> Option<Snapshot> {
        if !self.running {
            return None;
        }

        self.halt_schedule();
        info!(tick = self.clock.current_tick(), "simulation stopped");

        Some(self.notify(Some("Stopped".to_string())))
    }

    /// Change the tick period
    ///
    /// The value is clamped to `min_interval_ms`. When running, the old
    /// registration is cancelled before the new one is made; if the new
    /// one is refused the engine stops. Simulation state is untouched.
    pub fn set_interval_ms(&mut self, interval_ms: u64) -> Snapshot {
        self.interval_ms = self.config.clamp_interval(interval_ms);
        if self.running {
            if let Err(err) = self.register_schedule() {
                self.halt_schedule();
                return self.report_schedule_failure(err);
            }
        }

        self.event_log.log(Event::IntervalChanged {
            tick: self.clock.current_tick(),
            interval_ms: self.interval_ms,
        });
        info!(interval_ms = self.interval_ms, "interval changed");

        let message = format!("Interval set to {} ms", self.interval_ms);
        self.notify(Some(message))
    }

    fn register_schedule(&mut self) -> Result<(), ScheduleError> {
        if let Some(handle) = self.schedule_handle.take() {
            self.scheduler.cancel(handle);
        }
        self.schedule_handle = Some(self.scheduler.schedule(self.interval_ms)?);
        Ok(())
    }

    fn report_schedule_failure(&mut self, err: ScheduleError) -> Snapshot {
        warn!(interval_ms = self.interval_ms, error = %err, "scheduling failed");
        self.event_log.log(Event::ScheduleFailed {
            tick: self.clock.current_tick(),
            reason: err.to_string(),
        });
        self.notify(Some(err.to_string()))
    }

    fn halt_schedule(&mut self) {
        if let Some(handle) = self.schedule_handle.take() {
            self.scheduler.cancel(handle);
        }
        self.running = false;
        self.event_log.log(Event::Stopped {
            tick: self.clock.current_tick(),
        });
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by one tick and emit a snapshot
    pub fn step(&mut self) -> Snapshot {
        let tick = self.clock.advance_tick();

        let arrived = self.admit_customers(tick);
        self.serve_customers();
        let left = self.drop_impatient_customers(tick);

        self.last_message = if arrived > 0 || left > 0 {
            Some(format!("Arrived {}, left {}", arrived, left))
        } else {
            None
        };

        self.clamp_reputation();
        self.advance_worker(tick);

        if self.clock.is_every(self.config.price_change_period) {
            self.reroll_ingredient_price(tick);
        }

        debug!(
            tick,
            arrived,
            left,
            queue = self.customers.len(),
            pizzas = self.pizzas,
            money = self.money,
            reputation = self.reputation,
            "tick complete"
        );

        self.notify(None)
    }

    /// Append this tick's arrivals to the queue
    fn admit_customers(&mut self, tick: u64) -> u64 {
        let extra = self
            .rng
            .int_inclusive(0, self.config.max_extra_customers as i64)
            .max(0) as u64;
        let count = self
            .config
            .base_customers
            .saturating_add(extra)
            .saturating_add(self.reputation_bonus_customers());

        for customer_id in self.customers.admit(count as usize) {
            self.event_log.log(Event::CustomerArrived { tick, customer_id });
        }
        count
    }

    /// Extra arrivals earned by reputation above the threshold; never negative
    pub fn reputation_bonus_customers(&self) -> u64 {
        let surplus = (self.reputation - self.config.reputation_bonus_threshold).max(0.0);
        (surplus / self.config.reputation_per_bonus_customer).floor() as u64
    }

    /// Serve pass: match ready pizzas to the oldest waiting customers
    ///
    /// Returns the number of customers served.
    fn serve_customers(&mut self) -> u64 {
        let tick = self.clock.current_tick();
        let mut served = 0;

        while self.pizzas > 0 {
            let Some(customer) = self.customers.pop_oldest() else {
                break;
            };

            self.pizzas -= 1;
            self.money += self.config.price_per_pizza;
            self.reputation =
                (self.reputation + self.config.reputation_per_serve).min(self.config.max_reputation);
            served += 1;

            self.event_log.log(Event::CustomerServed {
                tick,
                customer_id: customer.id,
                waited: customer.waited,
                revenue: self.config.price_per_pizza,
            });
        }

        if served > 0 {
            self.last_message = Some(format!("Served {} customer(s)", served));
        }
        served
    }

    fn drop_impatient_customers(&mut self, tick: u64) -> u64 {
        let left = self
            .customers
            .age_and_drop_impatient(self.config.customer_patience);

        for customer in &left {
            self.reputation = (self.reputation - self.config.reputation_per_departure)
                .max(self.config.min_reputation);
            self.event_log.log(Event::CustomerLeft {
                tick,
                customer_id: customer.id,
            });
        }
        left.len() as u64
    }

    fn clamp_reputation(&mut self) {
        self.reputation = self
            .reputation
            .clamp(self.config.min_reputation, self.config.max_reputation);
    }

    fn advance_worker(&mut self, tick: u64) {
        if !self.worker.tick_down() {
            return;
        }

        let (car_id, name, delivered) = match self.current_car() {
            Some(car) => (car.id.clone(), car.name.clone(), car.ingredient_yield),
            None => (String::new(), "none".to_string(), 0),
        };

        self.ingredients += delivered;
        self.event_log.log(Event::WorkerReturned {
            tick,
            car_id,
            ingredients: delivered,
        });
        info!(tick, delivered, car = %name, "worker returned");

        self.last_message = Some(format!(
            "Worker returned with {} ingredient units (car: {})",
            delivered, name
        ));
    }

    fn reroll_ingredient_price(&mut self, tick: u64) {
        let old_price = self.ingredient_price;
        self.ingredient_price = self.rng.int_inclusive(
            self.config.min_ingredient_price,
            self.config.max_ingredient_price,
        ) as f64;

        self.event_log.log(Event::IngredientPriceChanged {
            tick,
            old_price,
            new_price: self.ingredient_price,
        });
        debug!(tick, old_price, new_price = self.ingredient_price, "ingredient price changed");
    }

    // ========================================================================
    // Player Commands
    // ========================================================================

    /// Turn ingredients into one pizza and serve immediately
    pub fn make_pizza(&mut self) -> bool {
        self.try_make_pizza().is_ok()
    }

    /// [`SimulationEngine::make_pizza`] with the rejection reason
    pub fn try_make_pizza(&mut self) -> Result<Snapshot, CommandError> {
        let outcome = self.apply_make_pizza();
        self.finish_command("make_pizza", outcome)
    }

    fn apply_make_pizza(&mut self) -> Result<(), CommandError> {
        let required = self.config.ingredients_per_pizza;
        if self.ingredients < required {
            return Err(CommandError::InsufficientIngredients {
                required,
                available: self.ingredients,
            });
        }

        self.ingredients -= required;
        self.pizzas += 1;
        self.event_log.log(Event::PizzaMade {
            tick: self.clock.current_tick(),
            ingredients_used: required,
        });

        // The serve pass overwrites this when it serves anyone
        self.last_message = Some("Made 1 pizza".to_string());
        self.serve_customers();
        Ok(())
    }

    /// Dispatch the worker to buy ingredients, paying up front
    pub fn send_worker(&mut self) -> bool {
        self.try_send_worker().is_ok()
    }

    /// [`SimulationEngine::send_worker`] with the rejection reason
    pub fn try_send_worker(&mut self) -> Result<Snapshot, CommandError> {
        let outcome = self.apply_send_worker();
        self.finish_command("send_worker", outcome)
    }

    fn apply_send_worker(&mut self) -> Result<(), CommandError> {
        if self.worker.fetching {
            return Err(CommandError::AlreadyFetching);
        }
        if self.money < self.ingredient_price {
            return Err(CommandError::InsufficientFunds {
                spend: Spend::WorkerTrip,
                required: self.ingredient_price,
                available: self.money,
            });
        }
        let (car_id, return_ticks) = match self.current_car() {
            Some(car) => (car.id.clone(), car.return_ticks),
            None => return Err(CommandError::NoCarAvailable),
        };

        let cost = self.ingredient_price;
        self.worker.dispatch(return_ticks);
        self.money -= cost;

        self.event_log.log(Event::WorkerDispatched {
            tick: self.clock.current_tick(),
            car_id: car_id.clone(),
            cost,
            return_ticks,
        });
        info!(cost, return_ticks, car = %car_id, "worker dispatched");

        self.last_message = Some(format!(
            "Worker dispatched to fetch ingredients (cost ${:.2})",
            cost
        ));
        Ok(())
    }

    /// Replace the owned car with `car_id`
    ///
    /// The old car is neither refunded nor kept.
    pub fn buy_car(&mut self, car_id: &str) -> bool {
        self.try_buy_car(car_id).is_ok()
    }

    /// [`SimulationEngine::buy_car`] with the rejection reason
    pub fn try_buy_car(&mut self, car_id: &str) -> Result<Snapshot, CommandError> {
        let outcome = self.apply_buy_car(car_id);
        self.finish_command("buy_car", outcome)
    }

    fn apply_buy_car(&mut self, car_id: &str) -> Result<(), CommandError> {
        let tick = self.clock.current_tick();
        let car = self
            .config
            .cars
            .get(car_id)
            .cloned()
            .ok_or_else(|| CommandError::UnknownCar(car_id.to_string()))?;

        if car.id == self.owned_car_id {
            return Err(CommandError::CarAlreadyOwned(car.id));
        }
        if !car.is_unlocked_at(tick) {
            return Err(CommandError::CarLocked {
                car_id: car.id,
                unlock_tick: car.unlock_tick,
                tick,
            });
        }
        if self.money < car.price {
            return Err(CommandError::InsufficientFunds {
                spend: Spend::Car,
                required: car.price,
                available: self.money,
            });
        }

        self.money -= car.price;
        let previous_car_id = std::mem::replace(&mut self.owned_car_id, car.id.clone());

        self.event_log.log(Event::CarPurchased {
            tick,
            car_id: car.id.clone(),
            previous_car_id,
            price: car.price,
        });
        info!(car = %car.id, price = car.price, "car purchased");

        self.last_message = Some(format!("Purchased {}", car.name));
        Ok(())
    }

    /// Return the economy to its starting point
    ///
    /// Stops scheduling if running, then resets tick, pizzas, queue, money,
    /// reputation and the event log. Ingredients, ingredient price, the
    /// owned car and any in-flight worker trip are kept. Emits one snapshot.
    pub fn reset(&mut self) -> Snapshot {
        if self.running {
            self.halt_schedule();
        }

        self.clock.reset();
        self.pizzas = 0;
        self.customers.clear();
        self.money = self.config.initial_money;
        self.reputation = self.config.initial_reputation;

        self.event_log.clear();
        self.event_log.log(Event::Reset { tick: 0 });
        info!("simulation reset");

        self.notify(Some("Reset".to_string()))
    }

    fn finish_command(
        &mut self,
        command: &str,
        outcome: Result<(), CommandError>,
    ) -> Result<Snapshot, CommandError> {
        match outcome {
            Ok(()) => Ok(self.notify(None)),
            Err(err) => {
                debug!(command, reason = %err, "command rejected");
                self.event_log.log(Event::CommandRejected {
                    tick: self.clock.current_tick(),
                    command: command.to_string(),
                    reason: err.to_string(),
                });
                self.notify(Some(err.to_string()));
                Err(err)
            }
        }
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Publish a snapshot of the current state and clear the pending message
    ///
    /// `message`, when given, replaces the pending message. Sink errors and
    /// panics are logged and discarded.
    pub fn notify(&mut self, message: Option<String>) -> Snapshot {
        if message.is_some() {
            self.last_message = message;
        }

        let snapshot = self.snapshot();
        let sink = &mut self.sink;
        match panic::catch_unwind(AssertUnwindSafe(|| sink.publish(&snapshot))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, tick = snapshot.tick, "snapshot sink failed"),
            Err(_) => warn!(tick = snapshot.tick, "snapshot sink panicked"),
        }

        self.last_message = None;
        snapshot
    }

    /// Build a snapshot without publishing it or clearing the message
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.clock.current_tick(),
            pizzas: self.pizzas,
            customers: self.customers.len(),
            ingredients: self.ingredients,
            ingredient_price: self.ingredient_price,
            worker: self.worker,
            current_car: self.current_car().cloned(),
            next_car: self.next_available_car().cloned(),
            money: self.money,
            reputation: self.reputation,
            interval_ms: self.interval_ms,
            last_message: self.last_message.clone(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The owned car
    pub fn current_car(&self) -> Option<&CarSpec> {
        self.config.cars.get(&self.owned_car_id)
    }

    /// First unlocked catalog entry other than the owned car, affordable or not
    pub fn next_available_car(&self) -> Option<&CarSpec> {
        self.config
            .cars
            .next_available(&self.owned_car_id, self.clock.current_tick())
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.current_tick()
    }

    pub fn pizzas(&self) -> u64 {
        self.pizzas
    }

    pub fn customers(&self) -> &CustomerQueue {
        &self.customers
    }

    pub fn ingredients(&self) -> u64 {
        self.ingredients
    }

    pub fn ingredient_price(&self) -> f64 {
        self.ingredient_price
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    pub fn reputation(&self) -> f64 {
        self.reputation
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn worker(&self) -> WorkerState {
        self.worker
    }

    pub fn owned_car_id(&self) -> &str {
        &self.owned_car_id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("tick", &self.clock.current_tick())
            .field("pizzas", &self.pizzas)
            .field("customers", &self.customers.len())
            .field("ingredients", &self.ingredients)
            .field("money", &self.money)
            .field("reputation", &self.reputation)
            .field("worker", &self.worker)
            .field("owned_car_id", &self.owned_car_id)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}
