//! ttbench - Timetabling MILP benchmarks across solver backends
//!
//! Load school-timetabling instances, formulate them as 0-1 assignment
//! models and compare solver backends on bounds, gap and runtime.
//!
//! # Example
//!
//! ```rust
//! use ttbench::prelude::*;
//!
//! let instance = TextLoader::new()
//!     .load_str(
//!         "demo",
//!         "Times:\nT1, Mon 1\nT2, Mon 2\n\
//!          Resources:\nR1, 1A, Class\nR2, Alice, Teacher\n\
//!          Events:\nE1, Maths, 1, R1, R2\nE2, Art, 1, R1, R2\n",
//!     )
//!     .unwrap();
//!
//! let model = ModelBuilder::new(&instance).build().unwrap();
//! assert_eq!(model.num_variables(), 4);
//!
//! let summary = DecompositionSolver::new()
//!     .solve(model, &SolveConfig::default())
//!     .unwrap();
//! assert_eq!(summary.upper_bound, Some(2.0));
//! ```

pub use ttbench_core::{
    write_lp, BuildError, ConstraintSense, CostFunction, Event, Instance, LinearConstraint,
    ModelBuilder, ModelStats, ObjectiveSense, OptimizationModel, Resource, ResourceKind, Time,
    TimeWeightedCost, UniformCost, ValidationError, VarId, Variable,
};

pub use ttbench_loader::{
    instance_name, AutoLoader, InstanceFormat, InstanceLoader, LoadError, TextLoader, XmlLoader,
};

pub use ttbench_solver::{
    available_backends, compute_gap, create_adapter, BackendKind, BackendOptions,
    BranchAndBoundSolver, DecompositionSolver, SolutionSummary, SolveConfig, SolveStatus,
    SolverAdapter, SolverError,
};

pub use ttbench_config::{BenchmarkConfig, ConfigError, CostConfig};

pub use ttbench_benchmark::{
    Benchmark, BenchmarkCase, BenchmarkResult, ComparisonReport, InstanceResult, RunConfig,
};

#[cfg(feature = "console")]
pub use ttbench_console as console;

mod run;
pub use run::{run_benchmark, write_outputs, RunError};

pub mod prelude {
    pub use super::{
        BenchmarkConfig, CostFunction, Event, Instance, ModelBuilder, ObjectiveSense,
        OptimizationModel, Resource, Time, TimeWeightedCost, UniformCost,
    };
    pub use super::{AutoLoader, InstanceLoader, TextLoader, XmlLoader};
    pub use super::{
        create_adapter, BackendOptions, BranchAndBoundSolver, DecompositionSolver, SolveConfig,
        SolveStatus, SolverAdapter,
    };
    pub use super::{run_benchmark, Benchmark, ComparisonReport, RunConfig};
}
