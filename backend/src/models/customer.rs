//! Customer queue model
//!
//! Customers wait in a single FIFO line. Insertion order is arrival order
//! and also service order: the head of the queue has always waited longest.
//!
//! # Critical Invariants
//!
//! 1. **FIFO**: customers are served and aged in arrival order
//! 2. **Unique IDs**: ids are assigned sequentially and never reused, even
//!    across [`CustomerQueue::clear`]

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single waiting customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique, monotonically assigned id
    pub id: u64,

    /// Ticks spent in the queue so far
    pub waited: u32,
}

/// FIFO line of waiting customers
///
/// # Example
/// ```
/// use pizza_shop_core_rs::CustomerQueue;
///
/// let mut queue = CustomerQueue::new();
/// queue.admit(2);
/// assert_eq!(queue.len(), 2);
///
/// let first = queue.pop_oldest().unwrap();
/// assert_eq!(first.id, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerQueue {
    customers: VecDeque<Customer>,

    /// Id handed to the next arriving customer
    next_id: u64,
}

impl Default for CustomerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerQueue {
    pub fn new() -> Self {
        Self {
            customers: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Append `count` fresh customers to the tail, returning their ids
    pub fn admit(&mut self, count: usize) -> Vec<u64> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_id;
            self.next_id += 1;
            self.customers.push_back(Customer { id, waited: 0 });
            ids.push(id);
        }
        ids
    }

    /// Remove and return the longest-waiting customer
    pub fn pop_oldest(&mut self) -> Option<Customer> {
        self.customers.pop_front()
    }

    /// Age every customer by one tick and remove those whose patience ran out
    ///
    /// A customer leaves once `waited >= patience`. Survivors keep their
    /// relative order. Returns the customers who left, oldest first.
    ///
    /// # Example
    /// ```
    /// use pizza_shop_core_rs::CustomerQueue;
    ///
    /// let mut queue = CustomerQueue::new();
    /// queue.admit(1);
    /// for _ in 0..9 {
    ///     assert!(queue.age_and_drop_impatient(10).is_empty());
    /// }
    /// assert_eq!(queue.age_and_drop_impatient(10).len(), 1);
    /// assert!(queue.is_empty());
    /// ```
    pub fn age_and_drop_impatient(&mut self, patience: u32) -> Vec<Customer> {
        let mut left = Vec::new();
        let mut remaining = VecDeque::with_capacity(self.customers.len());

        for mut customer in self.customers.drain(..) {
            customer.waited += 1;
            if customer.waited >= patience {
                left.push(customer);
            } else {
                remaining.push_back(customer);
            }
        }

        self.customers = remaining;
        left
    }

    /// Empty the line; the id counter keeps running
    pub fn clear(&mut self) {
        self.customers.clear();
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Oldest customer without removing it
    pub fn front(&self) -> Option<&Customer> {
        self.customers.front()
    }

    /// Iterate in service order (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }
}
