//! Benchmark result types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ttbench_core::{ModelStats, ObjectiveSense};
use ttbench_solver::SolutionSummary;

/// Outcome of one instance across all backends.
///
/// A failed instance carries its load or build error and no summaries.
/// Otherwise there is one summary per backend, in backend order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceResult {
    /// Instance name.
    pub name: String,
    /// Model dimensions, absent if the model was never built.
    pub stats: Option<ModelStats>,
    /// Time spent building the model.
    pub build_time: Duration,
    /// Load or build error.
    pub error: Option<String>,
    pub summaries: Vec<SolutionSummary>,
}

impl InstanceResult {
    /// Creates a result for an instance whose model was built.
    pub fn new(name: impl Into<String>, stats: ModelStats, build_time: Duration) -> Self {
        Self {
            name: name.into(),
            stats: Some(stats),
            build_time,
            error: None,
            summaries: Vec::new(),
        }
    }

    /// Creates a result for an instance that could not be loaded or built.
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stats: None,
            build_time: Duration::ZERO,
            error: Some(error.into()),
            summaries: Vec::new(),
        }
    }

    pub fn add_summary(&mut self, summary: SolutionSummary) {
        self.summaries.push(summary);
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the first summary reported by `backend`.
    pub fn summary(&self, backend: &str) -> Option<&SolutionSummary> {
        self.summaries.iter().find(|s| s.backend == backend)
    }

    /// Returns the summary of the backend in column `index`.
    ///
    /// Summaries are stored in backend order, so this stays correct when
    /// two backends share a name.
    pub fn summary_at(&self, index: usize) -> Option<&SolutionSummary> {
        self.summaries.get(index)
    }
}

/// Results of a whole benchmark run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ttbench_benchmark::{BenchmarkResult, InstanceResult};
/// use ttbench_core::{ModelStats, ObjectiveSense};
/// use ttbench_solver::{SolutionSummary, SolveStatus};
///
/// let mut result = BenchmarkResult::new("Test", ObjectiveSense::Minimize, vec!["a".into()]);
///
/// let mut ok = InstanceResult::new("inst1", ModelStats::default(), Duration::ZERO);
/// ok.add_summary(SolutionSummary::from_bounds("a", SolveStatus::Optimal, 3.0, 3.0));
/// result.add_instance(ok);
/// result.add_instance(InstanceResult::failed("inst2", "line 3: bad row"));
///
/// assert_eq!(result.instance_count(), 2);
/// assert_eq!(result.run_count(), 1);
/// assert_eq!(result.failed_instances(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark name.
    pub name: String,
    pub sense: ObjectiveSense,
    /// Backend names, in column order.
    pub backends: Vec<String>,
    /// Per-instance results, in input order.
    pub instances: Vec<InstanceResult>,
    /// Wall-clock time of the whole run.
    pub total_time: Duration,
}

impl BenchmarkResult {
    /// Creates an empty result.
    pub fn new(name: impl Into<String>, sense: ObjectiveSense, backends: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sense,
            backends,
            instances: Vec::new(),
            total_time: Duration::ZERO,
        }
    }

    pub fn add_instance(&mut self, instance: InstanceResult) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Returns the result for the instance called `name`.
    pub fn instance(&self, name: &str) -> Option<&InstanceResult> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Number of (instance, backend) runs attempted.
    pub fn run_count(&self) -> usize {
        self.instances.iter().map(|i| i.summaries.len()).sum()
    }

    /// Number of runs whose adapter raised an error.
    pub fn failed_runs(&self) -> usize {
        self.instances
            .iter()
            .flat_map(|i| &i.summaries)
            .filter(|s| s.is_failed())
            .count()
    }

    /// Number of instances that could not be loaded or built.
    pub fn failed_instances(&self) -> usize {
        self.instances.iter().filter(|i| i.is_failed()).count()
    }

    /// Total solve time of one backend over all its runs.
    pub fn total_solve_time(&self, backend: &str) -> Duration {
        self.instances
            .iter()
            .filter_map(|i| i.summary(backend))
            .map(|s| s.solve_time)
            .sum()
    }
}
