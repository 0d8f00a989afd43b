//! Run command - benchmark instances against solver backends

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ttbench::{
    available_backends, run_benchmark, BenchmarkConfig, BenchmarkResult, ComparisonReport,
    ObjectiveSense,
};

/// How the results table is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Csv,
    Json,
}

#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Benchmark config file (TOML, or YAML by extension)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Backend to run; repeat for several columns (default: all backends)
    #[arg(long = "backend", value_name = "ID")]
    pub backends: Vec<String>,

    /// Per-run time limit in seconds
    #[arg(long, value_name = "SECONDS")]
    pub time_limit: Option<f64>,

    /// Maximize the objective instead of minimizing it
    #[arg(long)]
    pub maximize: bool,

    /// Output format for the results table
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Instance files, run after those listed in the config
    pub instances: Vec<PathBuf>,
}

impl RunCmd {
    pub fn execute(&self, out: &mut impl Write) -> Result<()> {
        let config = self.benchmark_config()?;
        let result = run_benchmark(&config).context("Benchmark failed")?;
        write_result(&result, self.format, out)
    }

    /// Merges the config file, if any, with the command-line overrides.
    fn benchmark_config(&self) -> Result<BenchmarkConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let base = path.parent().unwrap_or(Path::new(""));
                BenchmarkConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
                    .resolve_paths(base)
            }
            None => BenchmarkConfig::new(),
        };

        if !self.backends.is_empty() {
            config.backends = self.backends.clone();
        }
        if let Some(seconds) = self.time_limit {
            config = config.with_time_limit_seconds(seconds);
        }
        if self.maximize {
            config = config.with_sense(ObjectiveSense::Maximize);
        }
        for instance in &self.instances {
            config = config.with_instance(instance);
        }

        if config.backends.is_empty() {
            config.backends = available_backends()
                .iter()
                .map(|kind| kind.id().to_string())
                .collect();
        }
        if config.instances.is_empty() {
            bail!("No instances given: pass instance files or list them in a config file");
        }
        Ok(config)
    }
}

fn write_result(
    result: &BenchmarkResult,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let report = ComparisonReport::from_result(result);
    match format {
        OutputFormat::Text => write!(out, "{}", report.to_text())?,
        OutputFormat::Markdown => write!(out, "{}", report.to_markdown())?,
        OutputFormat::Csv => write!(out, "{}", report.to_csv())?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(result)?)?,
    }
    Ok(())
}
