//! Exact oracle for block-structured models.
//!
//! When every variable belongs to at most one `Σ x = 1` row and there are no
//! other rows, the model splits into independent blocks: each block takes its
//! best variable, each unconstrained variable takes its better value. The
//! assignment formulation always has this shape.

use std::time::Instant;

use tracing::debug;
use ttbench_core::{ObjectiveSense, OptimizationModel};

use super::check_model;
use crate::adapter::{SolveConfig, SolverAdapter};
use crate::error::SolverError;
use crate::summary::{SolutionSummary, SolveStatus};

const NAME: &str = "decomposition";

/// Solves partition-structured 0-1 models block by block.
///
/// Rejects any other structure with [`SolverError::Build`]. The time limit
/// is ignored; the solve is linear in the number of nonzeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompositionSolver;

impl DecompositionSolver {
    pub fn new() -> Self {
        Self
    }
}

/// Native form: blocks of variable costs plus free variable costs.
struct Blocks {
    blocks: Vec<Vec<f64>>,
    free: Vec<f64>,
}

impl Blocks {
    fn from_model(model: &OptimizationModel) -> Result<Self, String> {
        check_model(model)?;

        let mut owner: Vec<Option<usize>> = vec![None; model.num_variables()];
        let mut blocks = Vec::with_capacity(model.num_constraints());
        for (row, constraint) in model.constraints().iter().enumerate() {
            if !constraint.is_choose_one() {
                return Err(format!(
                    "row {} is not a unit choose-one row",
                    constraint.name
                ));
            }
            let mut costs = Vec::with_capacity(constraint.terms.len());
            for &(var, _) in &constraint.terms {
                if let Some(previous) = owner[var.index()].replace(row) {
                    return Err(format!(
                        "variable {} appears in rows {} and {}",
                        model.variables()[var.index()].name,
                        model.constraints()[previous].name,
                        constraint.name
                    ));
                }
                costs.push(model.variables()[var.index()].cost);
            }
            blocks.push(costs);
        }

        let free = model
            .variables()
            .iter()
            .zip(&owner)
            .filter(|(_, owner)| owner.is_none())
            .map(|(variable, _)| variable.cost)
            .collect();

        Ok(Self { blocks, free })
    }

    fn optimize(&self, sense: ObjectiveSense) -> f64 {
        let pick = |costs: &[f64]| {
            costs
                .iter()
                .copied()
                .reduce(|best, c| if sense.is_better(c, best) { c } else { best })
                .unwrap_or(0.0)
        };
        let blocks: f64 = self.blocks.iter().map(|costs| pick(costs)).sum();
        let free: f64 = self
            .free
            .iter()
            .map(|&c| if sense.is_better(c, 0.0) { c } else { 0.0 })
            .sum();
        blocks + free
    }
}

impl SolverAdapter for DecompositionSolver {
    fn name(&self) -> &str {
        NAME
    }

    fn solve(
        &self,
        model: OptimizationModel,
        _config: &SolveConfig,
    ) -> Result<SolutionSummary, SolverError> {
        let started = Instant::now();
        let native = Blocks::from_model(&model).map_err(|m| SolverError::build(NAME, m))?;

        let objective = native.optimize(model.sense());
        if !objective.is_finite() {
            return Err(SolverError::optimize(
                NAME,
                format!("objective overflowed to {}", objective),
            ));
        }

        debug!(
            event = "decomposition_solved",
            model = model.name(),
            blocks = native.blocks.len() as u64,
            objective,
        );

        Ok(
            SolutionSummary::from_bounds(NAME, SolveStatus::Optimal, objective, objective)
                .with_solve_time(started.elapsed())
                .with_nodes(native.blocks.len() as u64),
        )
    }
}
