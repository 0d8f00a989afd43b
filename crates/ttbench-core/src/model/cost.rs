//! Objective coefficients for `x[e][t]`.

use std::collections::HashMap;

use crate::instance::{Event, Time};

/// Assigns an objective coefficient to "event starts at time".
///
/// Implemented for any `Fn(&Event, &Time) -> f64`.
///
/// # Example
///
/// ```
/// use ttbench_core::{CostFunction, Event, Time};
///
/// let late_is_expensive = |_: &Event, t: &Time| if t.id.ends_with("_5") { 10.0 } else { 1.0 };
/// let event = Event::new("E1", "Maths", 1, "R1", "R2");
/// assert_eq!(late_is_expensive.cost(&event, &Time::new("Mo_5", "")), 10.0);
/// ```
pub trait CostFunction: Send + Sync {
    fn cost(&self, event: &Event, time: &Time) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(&Event, &Time) -> f64 + Send + Sync,
{
    fn cost(&self, event: &Event, time: &Time) -> f64 {
        self(event, time)
    }
}

/// The same cost for every pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformCost(pub f64);

impl Default for UniformCost {
    fn default() -> Self {
        UniformCost(1.0)
    }
}

impl CostFunction for UniformCost {
    fn cost(&self, _event: &Event, _time: &Time) -> f64 {
        self.0
    }
}

/// Per-time costs with a fallback for unlisted times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWeightedCost {
    default: f64,
    weights: HashMap<String, f64>,
}

impl TimeWeightedCost {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            weights: HashMap::new(),
        }
    }

    /// Sets the cost of every event placed at `time_id`.
    pub fn with_weight(mut self, time_id: impl Into<String>, cost: f64) -> Self {
        self.weights.insert(time_id.into(), cost);
        self
    }

    pub fn default_cost(&self) -> f64 {
        self.default
    }

    pub fn weights(&self) -> &HashMap<String, f64> {
        &self.weights
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for TimeWeightedCost {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TimeWeightedCost::new(1.0), |acc, (k, v)| acc.with_weight(k, v))
    }
}

impl CostFunction for TimeWeightedCost {
    fn cost(&self, _event: &Event, time: &Time) -> f64 {
        self.weights.get(&time.id).copied().unwrap_or(self.default)
    }
}
