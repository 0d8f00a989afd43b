//! Benchmark runner.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};
use ttbench_config::BenchmarkConfig;
use ttbench_core::{Instance, ModelBuilder, OptimizationModel};
use ttbench_loader::{instance_name, AutoLoader, InstanceLoader};
use ttbench_solver::{
    create_adapter, BackendOptions, SolutionSummary, SolveConfig, SolverAdapter, SolverError,
};

use crate::config::RunConfig;
use crate::result::{BenchmarkResult, InstanceResult};

/// One instance to benchmark.
#[derive(Debug, Clone)]
pub enum BenchmarkCase {
    /// An instance already in memory.
    Instance(Instance),
    /// A file read with the harness loader when the case runs.
    File(PathBuf),
}

impl BenchmarkCase {
    /// Name shown in reports: the instance name, or the file stem.
    pub fn name(&self) -> String {
        match self {
            BenchmarkCase::Instance(instance) => instance.name().to_string(),
            BenchmarkCase::File(path) => instance_name(path),
        }
    }
}

impl From<Instance> for BenchmarkCase {
    fn from(instance: Instance) -> Self {
        BenchmarkCase::Instance(instance)
    }
}

impl From<PathBuf> for BenchmarkCase {
    fn from(path: PathBuf) -> Self {
        BenchmarkCase::File(path)
    }
}

/// Runs every instance against every backend, in order.
///
/// Each model is built once per instance and cloned for every backend; only
/// the adapter call is timed. Failures are recorded and the run continues:
/// a load or build error skips the instance, an adapter error leaves a
/// failed summary for that pair.
pub struct Benchmark {
    config: RunConfig,
    adapters: Vec<Box<dyn SolverAdapter>>,
    loader: Box<dyn InstanceLoader>,
}

impl Benchmark {
    /// Creates a benchmark over `adapters`, reading files with [`AutoLoader`].
    pub fn new(config: RunConfig, adapters: Vec<Box<dyn SolverAdapter>>) -> Self {
        Self {
            config,
            adapters,
            loader: Box::new(AutoLoader::new()),
        }
    }

    /// Instantiates the configured backends by identifier.
    ///
    /// # Errors
    ///
    /// [`SolverError::Init`] for the first unknown backend identifier.
    pub fn from_config(config: &BenchmarkConfig) -> Result<Self, SolverError> {
        let options = BackendOptions {
            node_limit: config.branch_and_bound.node_limit,
        };
        let adapters = config
            .backends
            .iter()
            .map(|id| create_adapter(id, &options))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(RunConfig::from(config), adapters))
    }

    /// Replaces the loader used for [`BenchmarkCase::File`] cases.
    pub fn with_loader(mut self, loader: impl InstanceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Appends a backend column.
    pub fn with_adapter(mut self, adapter: impl SolverAdapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Backend names, in column order.
    pub fn backend_names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    /// Runs all cases and returns the collected results.
    pub fn run<I>(&self, cases: I) -> BenchmarkResult
    where
        I: IntoIterator,
        I::Item: Into<BenchmarkCase>,
    {
        let cases: Vec<BenchmarkCase> = cases.into_iter().map(Into::into).collect();
        let started = Instant::now();
        let total = cases.len();

        info!(
            event = "benchmark_start",
            name = self.config.name(),
            instance_count = total as u64,
            backend_count = self.adapters.len() as u64,
            sense = %self.config.sense(),
            time_limit_secs = self
                .config
                .time_limit()
                .map_or(f64::NAN, |limit| limit.as_secs_f64()),
        );

        let mut result =
            BenchmarkResult::new(self.config.name(), self.config.sense(), self.backend_names());
        for (index, case) in cases.into_iter().enumerate() {
            result.add_instance(self.run_case(index, total, case));
        }
        result.total_time = started.elapsed();

        info!(
            event = "benchmark_end",
            name = self.config.name(),
            instance_count = result.instance_count() as u64,
            runs = result.run_count() as u64,
            failures = (result.failed_runs() + result.failed_instances()) as u64,
            duration_ms = result.total_time.as_millis() as u64,
        );

        result
    }

    /// Loads, builds and solves one case.
    fn run_case(&self, index: usize, total: usize, case: BenchmarkCase) -> InstanceResult {
        let name = case.name();
        info!(
            event = "instance_start",
            instance = %name,
            index = index as u64,
            total = total as u64,
        );

        let instance = match case {
            BenchmarkCase::Instance(instance) => instance,
            BenchmarkCase::File(path) => match self.loader.load(&path) {
                Ok(instance) => instance,
                Err(error) => {
                    warn!(event = "instance_failed", instance = %name, stage = "load", error = %error);
                    return InstanceResult::failed(name, error.to_string());
                }
            },
        };

        let build_started = Instant::now();
        let model = match ModelBuilder::new(&instance)
            .with_sense(self.config.sense())
            .with_cost(self.config.cost())
            .build()
        {
            Ok(model) => model,
            Err(error) => {
                warn!(event = "instance_failed", instance = %name, stage = "build", error = %error);
                return InstanceResult::failed(name, error.to_string());
            }
        };
        let build_time = build_started.elapsed();

        let stats = model.stats();
        info!(
            event = "model_built",
            instance = %name,
            variables = stats.variables as u64,
            constraints = stats.constraints as u64,
            nonzeros = stats.nonzeros as u64,
            duration_ms = build_time.as_millis() as u64,
        );

        let solve_config = self.config.solve_config();
        let mut result = InstanceResult::new(name, stats, build_time);
        for adapter in &self.adapters {
            let summary = run_backend(&result.name, adapter.as_ref(), &model, &solve_config);
            result.add_summary(summary);
        }
        result
    }
}

/// Runs one adapter on its own copy of `model`.
fn run_backend(
    instance: &str,
    adapter: &dyn SolverAdapter,
    model: &OptimizationModel,
    config: &SolveConfig,
) -> SolutionSummary {
    let backend = adapter.name().to_string();
    info!(event = "backend_start", instance, backend = %backend);

    let copy = model.clone();
    let started = Instant::now();
    let outcome = adapter.solve(copy, config);
    let elapsed = started.elapsed();

    match outcome {
        Ok(mut summary) => {
            summary.backend = backend;
            let summary = summary.with_solve_time(elapsed);
            info!(
                event = "backend_end",
                instance,
                backend = %summary.backend,
                status = %summary.status,
                lower_bound = summary.lower_bound.unwrap_or(f64::NAN),
                upper_bound = summary.upper_bound.unwrap_or(f64::NAN),
                gap = summary.gap.unwrap_or(f64::NAN),
                nodes = summary.nodes,
                duration_ms = elapsed.as_millis() as u64,
            );
            summary
        }
        Err(error) => {
            warn!(
                event = "backend_failed",
                instance,
                backend = %backend,
                stage = error.stage(),
                error = %error,
            );
            SolutionSummary::failed(backend, &error, elapsed)
        }
    }
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("config", &self.config)
            .field("backends", &self.backend_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
