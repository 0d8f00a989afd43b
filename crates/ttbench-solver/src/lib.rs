//! Solver adapters for ttbench.
//!
//! Every backend implements [`SolverAdapter`]: it receives its own copy of an
//! [`OptimizationModel`](ttbench_core::OptimizationModel), translates it into
//! its native form, optimizes, and reports a [`SolutionSummary`] with bounds,
//! gap and runtime. The benchmark harness depends only on the trait.
//!
//! Built-in backends, selected by identifier through [`create_adapter`]:
//!
//! | id | solver |
//! |----|--------|
//! | `decomposition` | [`DecompositionSolver`] |
//! | `branch-and-bound` | [`BranchAndBoundSolver`] |
//!
//! # Example
//!
//! ```
//! use ttbench_core::{ConstraintSense, ObjectiveSense, OptimizationModel};
//! use ttbench_solver::{create_adapter, BackendOptions, SolveConfig, SolveStatus};
//!
//! let mut model = OptimizationModel::new("pick-one", ObjectiveSense::Minimize);
//! let a = model.add_variable("a", 4.0);
//! let b = model.add_variable("b", 3.0);
//! model.add_constraint("one", vec![(a, 1.0), (b, 1.0)], ConstraintSense::Equal, 1.0);
//!
//! let adapter = create_adapter("branch-and-bound", &BackendOptions::default()).unwrap();
//! let summary = adapter.solve(model, &SolveConfig::default()).unwrap();
//!
//! assert_eq!(summary.status, SolveStatus::Optimal);
//! assert_eq!(summary.upper_bound, Some(3.0));
//! assert_eq!(summary.gap, Some(0.0));
//! ```

mod adapter;
pub mod backend;
mod error;
mod summary;

pub use adapter::{SolveConfig, SolverAdapter};
pub use backend::{
    available_backends, create_adapter, BackendKind, BackendOptions, BranchAndBoundSolver,
    DecompositionSolver,
};
pub use error::SolverError;
pub use summary::{compute_gap, SolutionSummary, SolveStatus};
