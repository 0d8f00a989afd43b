//! Harness configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ttbench_config::BenchmarkConfig;
use ttbench_core::{CostFunction, ObjectiveSense, UniformCost};
use ttbench_solver::SolveConfig;

/// Settings shared by every (instance, backend) run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ttbench_benchmark::RunConfig;
/// use ttbench_core::ObjectiveSense;
///
/// let config = RunConfig::new("School Benchmark")
///     .with_sense(ObjectiveSense::Maximize)
///     .with_time_limit(Duration::from_secs(60));
///
/// assert_eq!(config.name(), "School Benchmark");
/// assert_eq!(config.sense(), ObjectiveSense::Maximize);
/// assert_eq!(config.solve_config().time_limit(), Some(Duration::from_secs(60)));
/// ```
#[derive(Clone)]
pub struct RunConfig {
    name: String,
    sense: ObjectiveSense,
    cost: Arc<dyn CostFunction>,
    time_limit: Option<Duration>,
}

impl RunConfig {
    /// Creates a configuration with the given name.
    ///
    /// Defaults:
    /// - sense: minimize
    /// - cost: uniform 1.0
    /// - time limit: none
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sense: ObjectiveSense::Minimize,
            cost: Arc::new(UniformCost::default()),
            time_limit: None,
        }
    }

    pub fn with_sense(mut self, sense: ObjectiveSense) -> Self {
        self.sense = sense;
        self
    }

    /// Sets the objective coefficients used by the model builder.
    pub fn with_cost(mut self, cost: impl CostFunction + 'static) -> Self {
        self.cost = Arc::new(cost);
        self
    }

    pub fn with_shared_cost(mut self, cost: Arc<dyn CostFunction>) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the time limit handed to every backend.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn cost(&self) -> &dyn CostFunction {
        self.cost.as_ref()
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// The options passed through to each adapter.
    pub fn solve_config(&self) -> SolveConfig {
        match self.time_limit {
            Some(limit) => SolveConfig::new().with_time_limit(limit),
            None => SolveConfig::new(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new("Benchmark")
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("name", &self.name)
            .field("sense", &self.sense)
            .field("time_limit", &self.time_limit)
            .finish_non_exhaustive()
    }
}

impl From<&BenchmarkConfig> for RunConfig {
    fn from(config: &BenchmarkConfig) -> Self {
        let run = RunConfig::new(config.name.clone())
            .with_sense(config.sense)
            .with_shared_cost(Arc::from(config.cost.to_cost_function()));
        match config.time_limit() {
            Some(limit) => run.with_time_limit(limit),
            None => run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttbench_config::CostConfig;
    use ttbench_core::{Event, Time};

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.name(), "Benchmark");
        assert_eq!(config.sense(), ObjectiveSense::Minimize);
        assert_eq!(config.time_limit(), None);
        assert_eq!(config.solve_config(), SolveConfig::default());

        let event = Event::new("E", "", 1, "C", "P");
        assert_eq!(config.cost().cost(&event, &Time::new("T", "")), 1.0);
    }

    #[test]
    fn test_from_benchmark_config() {
        let file = BenchmarkConfig::new()
            .with_name("nightly")
            .with_sense(ObjectiveSense::Maximize)
            .with_time_limit_seconds(1.5)
            .with_cost(CostConfig::Uniform { value: 4.0 });

        let config = RunConfig::from(&file);

        assert_eq!(config.name(), "nightly");
        assert_eq!(config.sense(), ObjectiveSense::Maximize);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
        let event = Event::new("E", "", 1, "C", "P");
        assert_eq!(config.cost().cost(&event, &Time::new("T", "")), 4.0);
    }

    #[test]
    fn test_closure_cost() {
        let config = RunConfig::new("c").with_cost(|e: &Event, _: &Time| e.duration as f64);
        let event = Event::new("E", "", 3, "C", "P");
        assert_eq!(config.cost().cost(&event, &Time::new("T", "")), 3.0);
    }
}
