//! Built-in backends and the identifier registry.

mod branch_and_bound;
mod decomposition;

use std::fmt;
use std::str::FromStr;

use ttbench_core::OptimizationModel;

pub use branch_and_bound::BranchAndBoundSolver;
pub use decomposition::DecompositionSolver;

use crate::adapter::SolverAdapter;
use crate::error::SolverError;

/// Built-in backend identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Decomposition,
    BranchAndBound,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Decomposition, BackendKind::BranchAndBound];

    /// Identifier used in configuration files and reports.
    pub fn id(self) -> &'static str {
        match self {
            BackendKind::Decomposition => "decomposition",
            BackendKind::BranchAndBound => "branch-and-bound",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BackendKind::Decomposition => {
                "exact oracle for models made of independent choose-one rows"
            }
            BackendKind::BranchAndBound => {
                "depth-first 0-1 branch and bound with node and time limits"
            }
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BackendKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decomposition" => Ok(BackendKind::Decomposition),
            "branch-and-bound" | "branch_and_bound" | "bnb" => Ok(BackendKind::BranchAndBound),
            _ => Err(SolverError::init(s, "unknown backend identifier")),
        }
    }
}

/// Backend-specific tuning, applied where it makes sense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendOptions {
    /// Node limit for `branch-and-bound`; its default when `None`.
    pub node_limit: Option<u64>,
}

/// Returns every built-in backend.
pub fn available_backends() -> &'static [BackendKind] {
    &BackendKind::ALL
}

/// Instantiates a backend by identifier.
///
/// # Errors
///
/// [`SolverError::Init`] for unknown identifiers.
///
/// # Example
///
/// ```
/// use ttbench_solver::{create_adapter, BackendOptions};
///
/// let adapter = create_adapter("bnb", &BackendOptions::default()).unwrap();
/// assert_eq!(adapter.name(), "branch-and-bound");
/// assert!(create_adapter("cplex", &BackendOptions::default()).is_err());
/// ```
pub fn create_adapter(
    id: &str,
    options: &BackendOptions,
) -> Result<Box<dyn SolverAdapter>, SolverError> {
    Ok(match id.parse::<BackendKind>()? {
        BackendKind::Decomposition => Box::new(DecompositionSolver::new()),
        BackendKind::BranchAndBound => {
            let solver = BranchAndBoundSolver::new();
            Box::new(match options.node_limit {
                Some(limit) => solver.with_node_limit(limit),
                None => solver,
            })
        }
    })
}

/// Checks that every term references an existing variable and every
/// number is finite. Shared by the built-in backends while translating.
pub(crate) fn check_model(model: &OptimizationModel) -> Result<(), String> {
    if model.num_variables() == 0 {
        return Err("model has no variables".to_string());
    }
    for variable in model.variables() {
        if !variable.cost.is_finite() {
            return Err(format!("variable {} has cost {}", variable.name, variable.cost));
        }
    }
    for constraint in model.constraints() {
        if !constraint.rhs.is_finite() {
            return Err(format!("row {} has rhs {}", constraint.name, constraint.rhs));
        }
        for &(var, coefficient) in &constraint.terms {
            if var.index() >= model.num_variables() {
                return Err(format!(
                    "row {} references unknown variable #{}",
                    constraint.name,
                    var.index()
                ));
            }
            if !coefficient.is_finite() {
                return Err(format!(
                    "row {} has coefficient {} for variable #{}",
                    constraint.name,
                    coefficient,
                    var.index()
                ));
            }
        }
    }
    Ok(())
}
