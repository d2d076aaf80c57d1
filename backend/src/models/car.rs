//! Delivery car catalog
//!
//! The car a worker drives decides how many ingredient units one trip
//! brings back (`size`) and how many ticks the trip takes (`speed`). The shop
//! owns exactly one car; buying another replaces it.
//!
//! Catalog order matters: "next available" is the first entry, in catalog
//! order, that is unlocked and not the owned car.

use serde::{Deserialize, Serialize};

/// One purchasable car
///
/// Serialized with the field names the UI payload uses (`size`, `speed`,
/// `price`, `unlockTick`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarSpec {
    /// Stable identifier (e.g., "kangoo")
    pub id: String,

    /// Display name
    pub name: String,

    /// Ingredient units delivered per trip
    #[serde(rename = "size")]
    pub ingredient_yield: u64,

    /// Ticks from dispatch until the worker returns
    #[serde(rename = "speed")]
    pub return_ticks: u32,

    /// Purchase price
    pub price: f64,

    /// First tick at which the car may be bought
    #[serde(rename = "unlockTick")]
    pub unlock_tick: u64,
}

impl CarSpec {
    pub fn new(
        id: &str,
        name: &str,
        ingredient_yield: u64,
        return_ticks: u32,
        price: f64,
        unlock_tick: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ingredient_yield,
            return_ticks,
            price,
            unlock_tick,
        }
    }

    /// True once `tick` has reached the unlock tick
    pub fn is_unlocked_at(&self, tick: u64) -> bool {
        tick >= self.unlock_tick
    }
}

/// Ordered, static list of cars
///
/// # Example
/// ```
/// use pizza_shop_core_rs::CarCatalog;
///
/// let catalog = CarCatalog::default();
/// let starter = catalog.starter_car().unwrap();
/// assert_eq!(starter.id, "fiat");
///
/// let next = catalog.next_available("fiat", 50).unwrap();
/// assert_eq!(next.id, "kangoo");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarCatalog {
    cars: Vec<CarSpec>,
}

impl Default for CarCatalog {
    fn default() -> Self {
        Self::new(vec![
            CarSpec::new("fiat", "Fiat Uno", 100, 10, 0.0, 0),
            CarSpec::new("kangoo", "Renault Kangoo", 220, 7, 300.0, 50),
            CarSpec::new("transit", "Ford Transit", 500, 4, 900.0, 150),
        ])
    }
}

impl CarCatalog {
    pub fn new(cars: Vec<CarSpec>) -> Self {
        Self { cars }
    }

    /// Look up a car by id
    pub fn get(&self, id: &str) -> Option<&CarSpec> {
        self.cars.iter().find(|car| car.id == id)
    }

    /// The first zero-price car; owned before any purchase
    pub fn starter_car(&self) -> Option<&CarSpec> {
        self.cars.iter().find(|car| car.price == 0.0)
    }

    /// First car in catalog order that is unlocked at `tick` and not `owned_id`
    ///
    /// Affordability is not considered.
    pub fn next_available(&self, owned_id: &str, tick: u64) -> Option<&CarSpec> {
        self.cars
            .iter()
            .find(|car| car.id != owned_id && car.is_unlocked_at(tick))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarSpec> {
        self.cars.iter()
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}
