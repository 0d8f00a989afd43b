//! Solver adapters with scripted outcomes.
//!
//! Both adapters count their `solve` calls so tests can check which
//! (instance, backend) pairs actually ran.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use ttbench_core::OptimizationModel;
use ttbench_solver::{SolutionSummary, SolveConfig, SolveStatus, SolverAdapter, SolverError};

/// Returns the same summary for every model.
#[derive(Debug)]
pub struct ScriptedAdapter {
    name: String,
    summary: SolutionSummary,
    delay: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, usize)>>,
    time_limits: Mutex<Vec<Option<Duration>>>,
}

impl ScriptedAdapter {
    /// Reports `lower` and `upper` with the given status.
    pub fn with_bounds(name: &str, status: SolveStatus, lower: f64, upper: f64) -> Self {
        Self::from_summary(SolutionSummary::from_bounds(name, status, lower, upper))
    }

    /// Proven optimal at `value`.
    pub fn optimal(name: &str, value: f64) -> Self {
        Self::with_bounds(name, SolveStatus::Optimal, value, value)
    }

    /// A limit hit before any incumbent; only the bound is known.
    pub fn no_solution(name: &str, lower: f64) -> Self {
        Self::from_summary(SolutionSummary::without_incumbent(
            name,
            SolveStatus::NoSolution,
            Some(lower),
        ))
    }

    pub fn from_summary(summary: SolutionSummary) -> Self {
        Self {
            name: summary.backend.clone(),
            summary,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            time_limits: Mutex::new(Vec::new()),
        }
    }

    /// Sleeps for `delay` inside every `solve` call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(model name, variable count)` of every model received, in order.
    pub fn seen_models(&self) -> Vec<(String, usize)> {
        self.seen.lock().expect("poisoned").clone()
    }

    /// Time limits received, in order.
    pub fn seen_time_limits(&self) -> Vec<Option<Duration>> {
        self.time_limits.lock().expect("poisoned").clone()
    }
}

impl SolverAdapter for ScriptedAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(
        &self,
        model: OptimizationModel,
        config: &SolveConfig,
    ) -> Result<SolutionSummary, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("poisoned")
            .push((model.name().to_string(), model.num_variables()));
        self.time_limits
            .lock()
            .expect("poisoned")
            .push(config.time_limit());
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(self.summary.clone())
    }
}

/// Fails every call with the same error.
#[derive(Debug)]
pub struct FailingAdapter {
    error: SolverError,
    calls: AtomicUsize,
}

impl FailingAdapter {
    pub fn new(error: SolverError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails like a backend whose environment cannot start.
    pub fn init(name: &str, message: &str) -> Self {
        Self::new(SolverError::init(name, message))
    }

    /// Fails like a backend whose optimize call errors out.
    pub fn optimize(name: &str, message: &str) -> Self {
        Self::new(SolverError::optimize(name, message))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SolverAdapter for FailingAdapter {
    fn name(&self) -> &str {
        self.error.backend()
    }

    fn solve(
        &self,
        _model: OptimizationModel,
        _config: &SolveConfig,
    ) -> Result<SolutionSummary, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}
