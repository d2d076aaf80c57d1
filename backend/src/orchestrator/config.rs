//! Engine configuration
//!
//! Every balancing constant of the shop lives here. `EngineConfig::default()`
//! is the standard game; drivers may load overrides from JSON. Missing JSON
//! fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::car::CarCatalog;
use crate::models::event::DEFAULT_EVENT_CAPACITY;

/// Upper bound on customers admitted in a single tick
///
/// Covers base, random extra and reputation bonus arrivals together.
pub const MAX_ARRIVALS_PER_TICK: u64 = 1_000_000;

/// Configuration validation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Car catalog is empty")]
    EmptyCatalog,

    #[error("Car catalog has no zero-price starter car")]
    NoStarterCar,

    #[error("Duplicate car id: {0}")]
    DuplicateCar(String),

    #[error("Car '{0}' must take at least one tick to return")]
    InstantCar(String),

    #[error("min_interval_ms must be positive")]
    ZeroMinInterval,

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} exceeds {limit}")]
    TooLarge { field: &'static str, limit: u64 },

    #[error("Car '{0}' has a negative or non-finite price")]
    InvalidCarPrice(String),

    #[error("Invalid range for {field}: {min} > {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("initial_reputation {value} outside [{min}, {max}]")]
    ReputationOutOfBounds { value: f64, min: f64, max: f64 },
}

/// Complete engine configuration
///
/// # Example
/// ```
/// use pizza_shop_core_rs::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{ "rng_seed": 7, "initial_money": 500.0 }"#).unwrap();
/// assert_eq!(config.rng_seed, 7);
/// assert_eq!(config.initial_money, 500.0);
/// assert_eq!(config.initial_ingredients, 180);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the default xorshift random source
    pub rng_seed: u64,

    /// Ingredient units in stock at construction
    pub initial_ingredients: u64,

    /// Price of the first worker trip
    pub initial_ingredient_price: f64,

    /// Money at construction and after reset
    pub initial_money: f64,

    /// Reputation at construction and after reset
    pub initial_reputation: f64,

    pub min_reputation: f64,
    pub max_reputation: f64,

    /// Tick period handed to the scheduler
    pub interval_ms: u64,

    /// Lower clamp for `set_interval_ms`
    pub min_interval_ms: u64,

    /// Revenue per served customer
    pub price_per_pizza: f64,

    /// Ingredient units consumed per pizza
    pub ingredients_per_pizza: u64,

    /// Guaranteed arrivals per tick
    pub base_customers: u64,

    /// Random extra arrivals per tick, uniform in `[0, max_extra_customers]`
    pub max_extra_customers: u64,

    /// Reputation above which bonus customers start arriving
    pub reputation_bonus_threshold: f64,

    /// Reputation points above the threshold per bonus customer
    pub reputation_per_bonus_customer: f64,

    /// Customers leave once they have waited this many ticks
    pub customer_patience: u32,

    /// Reputation gained per served customer
    pub reputation_per_serve: f64,

    /// Reputation lost per customer who leaves unserved
    pub reputation_per_departure: f64,

    /// Ingredient price is re-rolled every this many ticks
    pub price_change_period: u64,

    /// Inclusive bounds of the re-rolled ingredient price
    pub min_ingredient_price: i64,
    pub max_ingredient_price: i64,

    /// Purchasable cars, in display order
    pub cars: CarCatalog,

    /// Most recent events kept in the engine's event log
    pub max_logged_events: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rng_seed: 12345,
            initial_ingredients: 180,
            initial_ingredient_price: 150.0,
            initial_money: 0.0,
            initial_reputation: 100.0,
            min_reputation: 0.0,
            max_reputation: 200.0,
            interval_ms: 2000,
            min_interval_ms: 10,
            price_per_pizza: 8.0,
            ingredients_per_pizza: 4,
            base_customers: 1,
            max_extra_customers: 2,
            reputation_bonus_threshold: 100.0,
            reputation_per_bonus_customer: 50.0,
            customer_patience: 10,
            reputation_per_serve: 0.1,
            reputation_per_departure: 1.0,
            price_change_period: 5,
            min_ingredient_price: 100,
            max_ingredient_price: 200,
            cars: CarCatalog::default(),
            max_logged_events: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cars.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if self.cars.starter_car().is_none() {
            return Err(ConfigError::NoStarterCar);
        }

        let mut seen = HashSet::new();
        for car in self.cars.iter() {
            if !seen.insert(car.id.as_str()) {
                return Err(ConfigError::DuplicateCar(car.id.clone()));
            }
            if car.return_ticks == 0 {
                return Err(ConfigError::InstantCar(car.id.clone()));
            }
            if !car.price.is_finite() || car.price < 0.0 {
                return Err(ConfigError::InvalidCarPrice(car.id.clone()));
            }
        }

        for (field, value) in [
            ("initial_ingredient_price", self.initial_ingredient_price),
            ("initial_money", self.initial_money),
            ("initial_reputation", self.initial_reputation),
            ("min_reputation", self.min_reputation),
            ("max_reputation", self.max_reputation),
            ("price_per_pizza", self.price_per_pizza),
            ("reputation_bonus_threshold", self.reputation_bonus_threshold),
            ("reputation_per_bonus_customer", self.reputation_per_bonus_customer),
            ("reputation_per_serve", self.reputation_per_serve),
            ("reputation_per_departure", self.reputation_per_departure),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }

        for (field, value) in [
            ("initial_ingredient_price", self.initial_ingredient_price),
            ("initial_money", self.initial_money),
            ("price_per_pizza", self.price_per_pizza),
            ("reputation_per_serve", self.reputation_per_serve),
            ("reputation_per_departure", self.reputation_per_departure),
            ("min_ingredient_price", self.min_ingredient_price as f64),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field });
            }
        }

        if self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroMinInterval);
        }
        if self.ingredients_per_pizza == 0 {
            return Err(ConfigError::NonPositive {
                field: "ingredients_per_pizza",
            });
        }
        if self.customer_patience == 0 {
            return Err(ConfigError::NonPositive {
                field: "customer_patience",
            });
        }
        if self.price_change_period == 0 {
            return Err(ConfigError::NonPositive {
                field: "price_change_period",
            });
        }
        if self.reputation_per_bonus_customer <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "reputation_per_bonus_customer",
            });
        }
        if self.max_logged_events == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_logged_events",
            });
        }
        // The inclusive price draw needs room for `max + 1`
        if self.max_ingredient_price == i64::MAX {
            return Err(ConfigError::TooLarge {
                field: "max_ingredient_price",
                limit: (i64::MAX - 1) as u64,
            });
        }
        if self.max_arrivals_per_tick() > MAX_ARRIVALS_PER_TICK as f64 {
            return Err(ConfigError::TooLarge {
                field: "arrivals_per_tick",
                limit: MAX_ARRIVALS_PER_TICK,
            });
        }

        if self.min_ingredient_price > self.max_ingredient_price {
            return Err(ConfigError::InvalidRange {
                field: "ingredient_price",
                min: self.min_ingredient_price as f64,
                max: self.max_ingredient_price as f64,
            });
        }
        if self.min_reputation > self.max_reputation {
            return Err(ConfigError::InvalidRange {
                field: "reputation",
                min: self.min_reputation,
                max: self.max_reputation,
            });
        }
        if !(self.min_reputation..=self.max_reputation).contains(&self.initial_reputation) {
            return Err(ConfigError::ReputationOutOfBounds {
                value: self.initial_reputation,
                min: self.min_reputation,
                max: self.max_reputation,
            });
        }

        Ok(())
    }

    /// Most customers a single tick can admit, at maximum reputation
    pub fn max_arrivals_per_tick(&self) -> f64 {
        let surplus = (self.max_reputation - self.reputation_bonus_threshold).max(0.0);
        let bonus = (surplus / self.reputation_per_bonus_customer).floor();
        self.base_customers as f64 + self.max_extra_customers as f64 + bonus
    }

    /// Clamp a requested tick period to the configured minimum
    pub fn clamp_interval(&self, interval_ms: u64) -> u64 {
        interval_ms.max(self.min_interval_ms)
    }
}
