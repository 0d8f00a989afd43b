//! Solution summaries and gap computation.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SolverError;

/// How a backend run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// A limit was reached with an integer solution in hand.
    Feasible,
    /// A limit was reached before any integer solution was found.
    NoSolution,
    /// The model has no integer solution.
    Infeasible,
    /// The backend raised an error.
    Failed,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::NoSolution => "no solution",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Failed => "failed",
        })
    }
}

/// Relative gap in percent between a bound and an incumbent.
///
/// `|upper − lower| / |upper| · 100`. Zero when both values are zero;
/// NaN (with a warning) when only `upper` is zero. Unlike the signed
/// `(upper − lower) / upper`, this stays non-negative for negative
/// incumbents and under maximization.
///
/// # Example
///
/// ```
/// use ttbench_solver::compute_gap;
///
/// assert!((compute_gap(80.0, 100.0) - 20.0).abs() < 1e-9);
/// assert_eq!(compute_gap(50.0, 50.0), 0.0);
/// assert_eq!(compute_gap(0.0, 0.0), 0.0);
/// assert!(compute_gap(3.0, 0.0).is_nan());
/// assert!((compute_gap(-12.0, -10.0) - 20.0).abs() < 1e-9);
/// ```
pub fn compute_gap(lower: f64, upper: f64) -> f64 {
    if upper == 0.0 {
        if lower == 0.0 {
            return 0.0;
        }
        warn!(
            event = "undefined_gap",
            lower_bound = lower,
            "gap is undefined for a zero upper bound"
        );
        return f64::NAN;
    }
    (upper - lower).abs() * 100.0 / upper.abs()
}

/// Outcome of one (instance, backend) run.
///
/// `lower_bound` is the best proven objective bound and `upper_bound` the
/// objective of the best integer solution found. Under maximization the
/// bound sits above the incumbent; the field names follow the minimization
/// convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub backend: String,
    pub status: SolveStatus,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    /// Percent; `None` without both bounds.
    pub gap: Option<f64>,
    pub solve_time: Duration,
    /// Search nodes processed, 0 if the backend does not count them.
    pub nodes: u64,
    /// Error message for failed runs.
    pub failure: Option<String>,
}

impl SolutionSummary {
    /// Summary of a run that produced both a bound and an incumbent.
    ///
    /// # Example
    ///
    /// ```
    /// use ttbench_solver::{SolutionSummary, SolveStatus};
    ///
    /// let summary = SolutionSummary::from_bounds("demo", SolveStatus::Feasible, 80.0, 100.0);
    /// assert!((summary.gap.unwrap() - 20.0).abs() < 1e-9);
    /// ```
    pub fn from_bounds(
        backend: impl Into<String>,
        status: SolveStatus,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Self {
            backend: backend.into(),
            status,
            lower_bound: Some(lower_bound),
            upper_bound: Some(upper_bound),
            gap: Some(compute_gap(lower_bound, upper_bound)),
            solve_time: Duration::ZERO,
            nodes: 0,
            failure: None,
        }
    }

    /// Summary of a run without an integer solution.
    pub fn without_incumbent(
        backend: impl Into<String>,
        status: SolveStatus,
        lower_bound: Option<f64>,
    ) -> Self {
        Self {
            backend: backend.into(),
            status,
            lower_bound,
            upper_bound: None,
            gap: None,
            solve_time: Duration::ZERO,
            nodes: 0,
            failure: None,
        }
    }

    /// Placeholder for a run whose adapter raised `error`.
    pub fn failed(backend: impl Into<String>, error: &SolverError, elapsed: Duration) -> Self {
        Self {
            backend: backend.into(),
            status: SolveStatus::Failed,
            lower_bound: None,
            upper_bound: None,
            gap: None,
            solve_time: elapsed,
            nodes: 0,
            failure: Some(error.to_string()),
        }
    }

    pub fn with_solve_time(mut self, solve_time: Duration) -> Self {
        self.solve_time = solve_time;
        self
    }

    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.status == SolveStatus::Failed
    }

    /// Solve time in seconds.
    pub fn solve_secs(&self) -> f64 {
        self.solve_time.as_secs_f64()
    }
}
