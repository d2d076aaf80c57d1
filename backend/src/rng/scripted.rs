//! Scripted random source
//!
//! Replays a fixed list of draws. Available in all builds so integration
//! tests and drivers can reproduce exact arrival and price sequences.

use std::collections::VecDeque;

use super::RandomSource;

/// Random source that returns pre-recorded values
///
/// Each draw pops the next scripted value and clamps it into the requested
/// range. Once the script runs out, draws return `min`.
///
/// # Example
/// ```
/// use pizza_shop_core_rs::{RandomSource, ScriptedRng};
///
/// let mut rng = ScriptedRng::new([2, 175]);
/// assert_eq!(rng.int_inclusive(0, 2), 2);
/// assert_eq!(rng.int_inclusive(100, 200), 175);
/// assert_eq!(rng.int_inclusive(0, 2), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    values: VecDeque<i64>,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Source that always draws the lower bound
    pub fn always_min() -> Self {
        Self::default()
    }

    /// Append more draws to the end of the script
    pub fn push(&mut self, value: i64) {
        self.values.push_back(value);
    }

    /// Number of scripted draws left
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRng {
    fn int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        match self.values.pop_front() {
            Some(value) => value.clamp(min, max),
            None => min,
        }
    }
}
