//! One-call benchmark entry point driven by a [`BenchmarkConfig`].

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use ttbench_benchmark::{Benchmark, BenchmarkResult, ComparisonReport};
use ttbench_config::{BenchmarkConfig, ConfigError};
use ttbench_solver::SolverError;

/// Error from [`run_benchmark`].
///
/// Per-instance and per-backend failures never surface here; they are
/// recorded in the returned [`BenchmarkResult`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] SolverError),

    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Validates `config`, runs every configured instance against every
/// configured backend and writes the configured report files.
///
/// # Errors
///
/// Fails before any solving on an invalid configuration or an unknown
/// backend, and afterwards only if a report file cannot be written.
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkResult, RunError> {
    config.validate()?;
    let benchmark = Benchmark::from_config(config)?;
    let result = benchmark.run(config.instances.iter().cloned());
    write_outputs(config, &result)?;
    Ok(result)
}

/// Writes the CSV, Markdown and JSON files named in `config.output`.
pub fn write_outputs(config: &BenchmarkConfig, result: &BenchmarkResult) -> Result<(), RunError> {
    let output = &config.output;
    if output.csv.is_none() && output.markdown.is_none() && output.json.is_none() {
        return Ok(());
    }

    let report = ComparisonReport::from_result(result);
    if let Some(path) = &output.csv {
        write_file(path, &report.to_csv())?;
    }
    if let Some(path) = &output.markdown {
        write_file(path, &report.to_markdown())?;
    }
    if let Some(path) = &output.json {
        write_file(path, &serde_json::to_string_pretty(result)?)?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), RunError> {
    std::fs::write(path, contents).map_err(|source| RunError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!(event = "report_written", path = %path.display());
    Ok(())
}
