//! The backend plugin contract.

use std::time::Duration;

use ttbench_core::OptimizationModel;

use crate::error::SolverError;
use crate::summary::SolutionSummary;

/// Options handed to every backend untouched.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ttbench_solver::SolveConfig;
///
/// let config = SolveConfig::new().with_time_limit(Duration::from_secs(60));
/// assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
/// assert_eq!(SolveConfig::default().time_limit(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveConfig {
    time_limit: Option<Duration>,
}

impl SolveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend-side time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

/// A pluggable optimization backend.
///
/// Implementations own every native resource they create for the duration
/// of one `solve` call and release it before returning, on success and on
/// failure alike. Adapters must not keep state between calls.
pub trait SolverAdapter: Send + Sync {
    /// Identifier shown in reports.
    fn name(&self) -> &str;

    /// Optimizes `model` and reports bounds, gap and runtime.
    ///
    /// # Errors
    ///
    /// [`SolverError::Init`] if the backend cannot start,
    /// [`SolverError::Build`] if the model cannot be registered,
    /// [`SolverError::Optimize`] if the optimize call fails.
    fn solve(
        &self,
        model: OptimizationModel,
        config: &SolveConfig,
    ) -> Result<SolutionSummary, SolverError>;
}

impl<T: SolverAdapter + ?Sized> SolverAdapter for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(
        &self,
        model: OptimizationModel,
        config: &SolveConfig,
    ) -> Result<SolutionSummary, SolverError> {
        (**self).solve(model, config)
    }
}
