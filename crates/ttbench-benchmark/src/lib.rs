//! Benchmarking harness for ttbench.
//!
//! Runs timetabling instances against several solver backends and collects
//! comparable bound, gap and runtime figures.
//!
//! # Overview
//!
//! - [`Benchmark`] drives (instance × backend) runs in order, building each
//!   model once and handing every backend its own copy
//! - [`BenchmarkResult`] keeps one [`InstanceResult`] per instance, with
//!   load/build errors and per-backend summaries
//! - [`ComparisonReport`] renders the classic results table, with a `MEAN`
//!   row, as text, Markdown or CSV
//!
//! Failures never stop a run: a bad instance is skipped, a failing backend
//! leaves an empty cell, and everything else still runs.
//!
//! # Example
//!
//! ```
//! use ttbench_benchmark::{Benchmark, ComparisonReport, RunConfig};
//! use ttbench_core::{Event, Instance, Resource, Time};
//! use ttbench_solver::{create_adapter, BackendOptions};
//!
//! let instance = Instance::new(
//!     "tiny",
//!     vec![Time::new("T1", "Mon 1"), Time::new("T2", "Mon 2")],
//!     vec![Resource::class("R1", "1A"), Resource::teacher("R2", "Alice")],
//!     vec![Event::new("E1", "Maths", 1, "R1", "R2")],
//! )
//! .unwrap();
//!
//! let options = BackendOptions::default();
//! let adapters = vec![
//!     create_adapter("decomposition", &options).unwrap(),
//!     create_adapter("branch-and-bound", &options).unwrap(),
//! ];
//!
//! let result = Benchmark::new(RunConfig::new("Tiny"), adapters).run(vec![instance]);
//! let report = ComparisonReport::from_result(&result);
//!
//! assert_eq!(result.run_count(), 2);
//! assert_eq!(report.mean.cells[0].upper_bound, Some(1.0));
//! assert!(report.to_text().contains("MEAN"));
//! ```

mod config;
mod report;
mod result;
mod runner;

pub use config::RunConfig;
pub use report::{ComparisonReport, ReportCell, ReportRow, ABSENT, MEAN_LABEL};
pub use result::{BenchmarkResult, InstanceResult};
pub use runner::{Benchmark, BenchmarkCase};
