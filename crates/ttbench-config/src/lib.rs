//! Benchmark configuration for ttbench.
//!
//! Load a benchmark run from TOML or YAML: which instances to read, which
//! backends to compare, the objective and the per-backend time limit.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use ttbench_config::BenchmarkConfig;
//! use ttbench_core::ObjectiveSense;
//!
//! let config = BenchmarkConfig::from_toml_str(r#"
//!     name = "school"
//!     instances = ["data/a.txt", "data/b.txt"]
//!     backends = ["decomposition", "branch-and-bound"]
//!     sense = "minimize"
//!     time_limit_seconds = 60
//!
//!     [cost]
//!     type = "time_weighted"
//!     default = 1.0
//!     weights = { T5 = 10.0 }
//!
//!     [output]
//!     csv = "results.csv"
//! "#).unwrap();
//!
//! assert_eq!(config.backends.len(), 2);
//! assert_eq!(config.sense, ObjectiveSense::Minimize);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
//! config.validate().unwrap();
//! ```
//!
//! Missing files fall back to defaults:
//!
//! ```
//! use ttbench_config::BenchmarkConfig;
//!
//! let config = BenchmarkConfig::load("bench.toml").unwrap_or_default();
//! assert!(config.instances.is_empty());
//! ```


use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ttbench_core::{CostFunction, ObjectiveSense, TimeWeightedCost, UniformCost};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One benchmark run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BenchmarkConfig {
    /// Label used in reports.
    #[serde(default = "default_name")]
    pub name: String,

    /// Instance files, in report order.
    #[serde(default)]
    pub instances: Vec<PathBuf>,

    /// Backend identifiers, in column order.
    #[serde(default)]
    pub backends: Vec<String>,

    #[serde(default)]
    pub sense: ObjectiveSense,

    /// Passed to every backend; unlimited when absent.
    #[serde(default)]
    pub time_limit_seconds: Option<f64>,

    #[serde(default)]
    pub cost: CostConfig,

    #[serde(default)]
    pub branch_and_bound: BranchAndBoundConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "benchmark".to_string()
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            instances: Vec::new(),
            backends: Vec::new(),
            sense: ObjectiveSense::default(),
            time_limit_seconds: None,
            cost: CostConfig::default(),
            branch_and_bound: BranchAndBoundConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl BenchmarkConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, YAML for `.yaml`/`.yml`, TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an instance file.
    pub fn with_instance(mut self, path: impl Into<PathBuf>) -> Self {
        self.instances.push(path.into());
        self
    }

    /// Appends a backend column.
    pub fn with_backend(mut self, id: impl Into<String>) -> Self {
        self.backends.push(id.into());
        self
    }

    pub fn with_sense(mut self, sense: ObjectiveSense) -> Self {
        self.sense = sense;
        self
    }

    /// Sets the per-backend time limit.
    pub fn with_time_limit_seconds(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn with_cost(mut self, cost: CostConfig) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.branch_and_bound.node_limit = Some(node_limit);
        self
    }

    pub fn with_csv_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.csv = Some(path.into());
        self
    }

    pub fn with_markdown_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.markdown = Some(path.into());
        self
    }

    pub fn with_json_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.json = Some(path.into());
        self
    }

    /// Resolves relative instance and output paths against `base`,
    /// usually the directory of the configuration file.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.instances.iter_mut().for_each(resolve);
        self.output.csv.iter_mut().for_each(resolve);
        self.output.markdown.iter_mut().for_each(resolve);
        self.output.json.iter_mut().for_each(resolve);
        self
    }

    /// Returns the time limit as a Duration, if any.
    ///
    /// `None` as well for values [`validate`](Self::validate) rejects.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_seconds
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// Checks the values serde cannot.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for an empty or blank backend list, a time
    /// limit that is not a positive finite number, a zero node limit or a
    /// non-finite cost.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backends.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one backend is required".to_string(),
            ));
        }
        if let Some(blank) = self.backends.iter().position(|b| b.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "backend #{} has an empty identifier",
                blank + 1
            )));
        }
        if let Some(seconds) = self.time_limit_seconds {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "time_limit_seconds must be positive, got {}",
                    seconds
                )));
            }
        }
        if self.branch_and_bound.node_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "branch_and_bound.node_limit must be positive".to_string(),
            ));
        }
        self.cost.validate()
    }
}

/// Objective coefficients of the assignment model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CostConfig {
    /// The same cost for every (event, time) pair.
    Uniform {
        #[serde(default = "unit_cost")]
        value: f64,
    },

    /// Per-time costs keyed by time id, `default` for the rest.
    TimeWeighted {
        #[serde(default = "unit_cost")]
        default: f64,
        #[serde(default)]
        weights: HashMap<String, f64>,
    },
}

fn unit_cost() -> f64 {
    1.0
}

impl Default for CostConfig {
    fn default() -> Self {
        CostConfig::Uniform { value: unit_cost() }
    }
}

impl CostConfig {
    /// Builds the cost function this configuration describes.
    ///
    /// ```
    /// use ttbench_config::CostConfig;
    /// use ttbench_core::{Event, Time};
    ///
    /// let cost = CostConfig::TimeWeighted {
    ///     default: 1.0,
    ///     weights: [("T2".to_string(), 4.0)].into_iter().collect(),
    /// }
    /// .to_cost_function();
    ///
    /// let event = Event::new("E1", "Maths", 1, "R1", "R2");
    /// assert_eq!(cost.cost(&event, &Time::new("T1", "")), 1.0);
    /// assert_eq!(cost.cost(&event, &Time::new("T2", "")), 4.0);
    /// ```
    pub fn to_cost_function(&self) -> Box<dyn CostFunction> {
        match self {
            CostConfig::Uniform { value } => Box::new(UniformCost(*value)),
            CostConfig::TimeWeighted { default, weights } => Box::new(
                weights
                    .iter()
                    .fold(TimeWeightedCost::new(*default), |cost, (time, weight)| {
                        cost.with_weight(time.clone(), *weight)
                    }),
            ),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            CostConfig::Uniform { value } if !value.is_finite() => Err(ConfigError::Invalid(
                format!("uniform cost must be finite, got {}", value),
            )),
            CostConfig::TimeWeighted { default, .. } if !default.is_finite() => {
                Err(ConfigError::Invalid(format!(
                    "default cost must be finite, got {}",
                    default
                )))
            }
            CostConfig::TimeWeighted { weights, .. } => {
                match weights.iter().find(|(_, w)| !w.is_finite()) {
                    Some((time, weight)) => Err(ConfigError::Invalid(format!(
                        "cost for time {} must be finite, got {}",
                        time, weight
                    ))),
                    None => Ok(()),
                }
            }
            CostConfig::Uniform { .. } => Ok(()),
        }
    }
}

/// Settings of the `branch-and-bound` backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BranchAndBoundConfig {
    /// Maximum processed nodes; the backend default when absent.
    pub node_limit: Option<u64>,
}

/// Report files written after the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    pub csv: Option<PathBuf>,
    pub markdown: Option<PathBuf>,
    pub json: Option<PathBuf>,
}
