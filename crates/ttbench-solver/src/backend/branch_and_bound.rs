//! Depth-first 0-1 branch and bound.
//!
//! The search works on a minimization copy of the model (costs negated for
//! maximization). Each row tracks the smallest and largest activity still
//! reachable given the fixed variables, so infeasible partial assignments are
//! cut as soon as a row can no longer be met.
//!
//! Rows of the form `Σ x = 1` over variables not claimed by an earlier such
//! row form *groups*. The bound charges every group without a selected
//! variable its cheapest free member, and every free variable outside a group
//! its cost if negative. On the assignment formulation the root bound is the
//! optimum, so the first dive closes the search.

use std::time::{Duration, Instant};

use tracing::debug;
use ttbench_core::{ConstraintSense, ObjectiveSense, OptimizationModel};

use super::check_model;
use crate::adapter::{SolveConfig, SolverAdapter};
use crate::error::SolverError;
use crate::summary::{SolutionSummary, SolveStatus};

const NAME: &str = "branch-and-bound";

/// Node limit used when none is configured.
pub const DEFAULT_NODE_LIMIT: u64 = 1_000_000;

const TOLERANCE: f64 = 1e-9;

/// Elapsed time is checked once every this many nodes.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Exact 0-1 solver with node and time limits.
///
/// Stops with [`SolveStatus::Feasible`] or [`SolveStatus::NoSolution`] when a
/// limit is hit, reporting the best open bound as the lower bound.
///
/// # Example
///
/// ```
/// use ttbench_core::{ConstraintSense, ObjectiveSense, OptimizationModel};
/// use ttbench_solver::{BranchAndBoundSolver, SolveConfig, SolverAdapter};
///
/// let mut model = OptimizationModel::new("knapsack", ObjectiveSense::Maximize);
/// let a = model.add_variable("a", 3.0);
/// let b = model.add_variable("b", 2.0);
/// let c = model.add_variable("c", 2.0);
/// model.add_constraint(
///     "cap",
///     vec![(a, 2.0), (b, 1.0), (c, 1.0)],
///     ConstraintSense::LessEqual,
///     2.0,
/// );
///
/// let summary = BranchAndBoundSolver::new()
///     .solve(model, &SolveConfig::default())
///     .unwrap();
/// assert_eq!(summary.upper_bound, Some(4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchAndBoundSolver {
    node_limit: u64,
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self {
            node_limit: DEFAULT_NODE_LIMIT,
        }
    }

    /// Caps the number of processed nodes. Zero is rejected at solve time.
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverAdapter for BranchAndBoundSolver {
    fn name(&self) -> &str {
        NAME
    }

    fn solve(
        &self,
        model: OptimizationModel,
        config: &SolveConfig,
    ) -> Result<SolutionSummary, SolverError> {
        let started = Instant::now();
        if self.node_limit == 0 {
            return Err(SolverError::init(NAME, "node limit must be positive"));
        }

        let mut search = Search::from_model(&model).map_err(|m| SolverError::build(NAME, m))?;
        debug!(
            event = "bnb_start",
            model = model.name(),
            variables = model.num_variables() as u64,
            groups = search.groups.len() as u64,
            node_limit = self.node_limit,
        );

        let outcome = search.run(self.node_limit, config.time_limit(), started);

        // Back to the model's own sense.
        let sign = match model.sense() {
            ObjectiveSense::Minimize => 1.0,
            ObjectiveSense::Maximize => -1.0,
        };

        let summary = match (&outcome.incumbent, outcome.stopped) {
            (Some(values), stopped) => {
                let upper = model.objective_value(values);
                if !upper.is_finite() {
                    return Err(SolverError::optimize(
                        NAME,
                        format!("objective evaluated to {}", upper),
                    ));
                }
                match (stopped, outcome.open_bound) {
                    (Some(_), Some(bound)) => SolutionSummary::from_bounds(
                        NAME,
                        SolveStatus::Feasible,
                        sign * bound,
                        upper,
                    ),
                    _ => SolutionSummary::from_bounds(NAME, SolveStatus::Optimal, upper, upper),
                }
            }
            (None, Some(_)) => SolutionSummary::without_incumbent(
                NAME,
                SolveStatus::NoSolution,
                outcome.open_bound.map(|b| sign * b),
            ),
            (None, None) => SolutionSummary::without_incumbent(NAME, SolveStatus::Infeasible, None),
        };

        debug!(
            event = "bnb_end",
            model = model.name(),
            status = %summary.status,
            nodes = outcome.nodes,
            stopped_by = outcome.stopped.map(Limit::as_str).unwrap_or("exhausted"),
        );

        Ok(summary
            .with_solve_time(started.elapsed())
            .with_nodes(outcome.nodes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limit {
    Nodes,
    Time,
}

impl Limit {
    fn as_str(self) -> &'static str {
        match self {
            Limit::Nodes => "node_limit",
            Limit::Time => "time_limit",
        }
    }
}

#[derive(Debug)]
struct Outcome {
    incumbent: Option<Vec<bool>>,
    /// Smallest bound over open nodes and the incumbent, set when stopped.
    open_bound: Option<f64>,
    stopped: Option<Limit>,
    nodes: u64,
}

/// An open node: fix `order[depth]` to `value`.
#[derive(Debug, Clone, Copy)]
struct Pending {
    depth: usize,
    value: bool,
    /// Bound of the parent, valid for the whole subtree.
    bound: f64,
}

#[derive(Debug)]
struct Row {
    sense: ConstraintSense,
    rhs: f64,
    min_activity: f64,
    max_activity: f64,
}

impl Row {
    fn can_hold(&self) -> bool {
        match self.sense {
            ConstraintSense::Equal => {
                self.min_activity <= self.rhs + TOLERANCE
                    && self.max_activity >= self.rhs - TOLERANCE
            }
            ConstraintSense::LessEqual => self.min_activity <= self.rhs + TOLERANCE,
            ConstraintSense::GreaterEqual => self.max_activity >= self.rhs - TOLERANCE,
        }
    }
}

#[derive(Debug)]
struct Group {
    /// Members sorted by cost, cheapest first.
    vars: Vec<usize>,
    free: usize,
    ones: usize,
}

/// Native form plus the mutable state of the current search path.
#[derive(Debug)]
struct Search {
    costs: Vec<f64>,
    var_rows: Vec<Vec<(usize, f64)>>,
    rows: Vec<Row>,
    group_of: Vec<Option<usize>>,
    groups: Vec<Group>,
    ungrouped: Vec<usize>,
    /// Branching order; `order[..depth]` is fixed.
    order: Vec<usize>,
    values: Vec<Option<bool>>,
    depth: usize,
    fixed_cost: f64,
}

impl Search {
    fn from_model(model: &OptimizationModel) -> Result<Self, String> {
        check_model(model)?;

        let sign = match model.sense() {
            ObjectiveSense::Minimize => 1.0,
            ObjectiveSense::Maximize => -1.0,
        };
        let costs: Vec<f64> = model.variables().iter().map(|v| sign * v.cost).collect();
        let n = costs.len();

        let mut var_rows = vec![Vec::new(); n];
        let mut rows = Vec::with_capacity(model.num_constraints());
        for (r, constraint) in model.constraints().iter().enumerate() {
            let mut row = Row {
                sense: constraint.sense,
                rhs: constraint.rhs,
                min_activity: 0.0,
                max_activity: 0.0,
            };
            for &(var, coefficient) in &constraint.terms {
                row.min_activity += coefficient.min(0.0);
                row.max_activity += coefficient.max(0.0);
                var_rows[var.index()].push((r, coefficient));
            }
            rows.push(row);
        }

        let mut group_of = vec![None; n];
        let mut groups = Vec::new();
        for constraint in model.constraints() {
            if !constraint.is_choose_one() {
                continue;
            }
            let mut vars: Vec<usize> = constraint.terms.iter().map(|(v, _)| v.index()).collect();
            vars.sort_unstable();
            vars.dedup();
            if vars.len() != constraint.terms.len() || vars.iter().any(|&v| group_of[v].is_some())
            {
                continue;
            }
            for &v in &vars {
                group_of[v] = Some(groups.len());
            }
            vars.sort_by(|&a, &b| costs[a].total_cmp(&costs[b]).then(a.cmp(&b)));
            groups.push(Group {
                free: vars.len(),
                ones: 0,
                vars,
            });
        }

        let ungrouped: Vec<usize> = (0..n).filter(|&v| group_of[v].is_none()).collect();
        let order = groups
            .iter()
            .flat_map(|g| g.vars.iter().copied())
            .chain(ungrouped.iter().copied())
            .collect();

        Ok(Self {
            costs,
            var_rows,
            rows,
            group_of,
            groups,
            ungrouped,
            order,
            values: vec![None; n],
            depth: 0,
            fixed_cost: 0.0,
        })
    }

    fn run(&mut self, node_limit: u64, time_limit: Option<Duration>, started: Instant) -> Outcome {
        let mut outcome = Outcome {
            incumbent: None,
            open_bound: None,
            stopped: None,
            nodes: 0,
        };
        let mut best = f64::INFINITY;

        if !self.rows.iter().all(Row::can_hold) {
            return outcome;
        }
        let Some(root_bound) = self.bound() else {
            return outcome;
        };

        let mut stack = Vec::new();
        self.push_children(&mut stack, 0, root_bound);

        while let Some(node) = stack.pop() {
            if node.bound >= best - TOLERANCE {
                continue;
            }

            let stopped = if outcome.nodes >= node_limit {
                Some(Limit::Nodes)
            } else if time_limit.is_some_and(|limit| {
                outcome.nodes % TIME_CHECK_INTERVAL == 0 && started.elapsed() >= limit
            }) {
                Some(Limit::Time)
            } else {
                None
            };
            if stopped.is_some() {
                let open = stack.iter().map(|p| p.bound).fold(node.bound, f64::min);
                outcome.open_bound = Some(open.min(best));
                outcome.stopped = stopped;
                break;
            }

            outcome.nodes += 1;
            self.backtrack_to(node.depth);
            let var = self.order[node.depth];
            self.fix(var, node.value);

            if !self.var_rows[var].iter().all(|&(r, _)| self.rows[r].can_hold()) {
                continue;
            }
            let Some(bound) = self.bound() else {
                continue;
            };
            if bound >= best - TOLERANCE {
                continue;
            }

            if self.depth == self.order.len() {
                best = self.fixed_cost;
                outcome.incumbent = Some(self.values.iter().map(|v| *v == Some(true)).collect());
                debug!(event = "bnb_incumbent", objective = best, nodes = outcome.nodes);
                continue;
            }
            self.push_children(&mut stack, self.depth, bound);
        }

        outcome
    }

    /// Pushes the children of `order[depth]`, preferred value last.
    fn push_children(&self, stack: &mut Vec<Pending>, depth: usize, bound: f64) {
        let var = self.order[depth];
        let prefer_one = match self.group_of[var] {
            Some(g) if self.groups[g].ones > 0 => {
                stack.push(Pending {
                    depth,
                    value: false,
                    bound,
                });
                return;
            }
            Some(_) => true,
            None => self.costs[var] < 0.0,
        };
        for value in [!prefer_one, prefer_one] {
            stack.push(Pending {
                depth,
                value,
                bound,
            });
        }
    }

    /// Lower bound on any completion of the current path; `None` if some
    /// group has no free member left to select.
    fn bound(&self) -> Option<f64> {
        let mut bound = self.fixed_cost;
        for group in &self.groups {
            if group.ones > 0 {
                continue;
            }
            let cheapest = group.vars.iter().find(|&&v| self.values[v].is_none())?;
            bound += self.costs[*cheapest];
        }
        bound += self
            .ungrouped
            .iter()
            .filter(|&&v| self.values[v].is_none())
            .map(|&v| self.costs[v].min(0.0))
            .sum::<f64>();
        Some(bound)
    }

    fn fix(&mut self, var: usize, value: bool) {
        let x = if value { 1.0 } else { 0.0 };
        for &(r, a) in &self.var_rows[var] {
            let row = &mut self.rows[r];
            row.min_activity += a * x - a.min(0.0);
            row.max_activity += a * x - a.max(0.0);
        }
        if value {
            self.fixed_cost += self.costs[var];
        }
        if let Some(g) = self.group_of[var] {
            self.groups[g].free -= 1;
            if value {
                self.groups[g].ones += 1;
            }
        }
        self.values[var] = Some(value);
        self.depth += 1;
    }

    fn unfix(&mut self, var: usize) {
        let Some(value) = self.values[var].take() else {
            return;
        };
        let x = if value { 1.0 } else { 0.0 };
        for &(r, a) in &self.var_rows[var] {
            let row = &mut self.rows[r];
            row.min_activity -= a * x - a.min(0.0);
            row.max_activity -= a * x - a.max(0.0);
        }
        if value {
            self.fixed_cost -= self.costs[var];
        }
        if let Some(g) = self.group_of[var] {
            self.groups[g].free += 1;
            if value {
                self.groups[g].ones -= 1;
            }
        }
        self.depth -= 1;
    }

    fn backtrack_to(&mut self, depth: usize) {
        while self.depth > depth {
            let var = self.order[self.depth - 1];
            self.unfix(var);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DecompositionSolver;
    use ttbench_core::{
        Event, Instance, ModelBuilder, Resource, Time, TimeWeightedCost, VarId,
    };

    fn instance(events: usize, times: usize) -> Instance {
        Instance::new(
            "grid",
            (0..times)
                .map(|t| Time::new(format!("T{}", t), format!("slot {}", t)))
                .collect(),
            vec![Resource::class("C", "1A"), Resource::teacher("P", "Alice")],
            (0..events)
                .map(|e| Event::new(format!("E{}", e), format!("lesson {}", e), 1, "C", "P"))
                .collect(),
        )
        .unwrap()
    }

    /// Three profitable items, room for one.
    fn pick_one_of_three() -> OptimizationModel {
        let mut model = OptimizationModel::new("pick", ObjectiveSense::Minimize);
        let a = model.add_variable("a", -3.0);
        let b = model.add_variable("b", -2.0);
        let c = model.add_variable("c", -2.0);
        model.add_constraint(
            "cap",
            vec![(a, 1.0), (b, 1.0), (c, 1.0)],
            ConstraintSense::LessEqual,
            1.0,
        );
        model
    }

    fn knapsack() -> OptimizationModel {
        let mut model = OptimizationModel::new("knapsack", ObjectiveSense::Maximize);
        let a = model.add_variable("a", 3.0);
        let b = model.add_variable("b", 2.0);
        let c = model.add_variable("c", 2.0);
        model.add_constraint(
            "cap",
            vec![(a, 2.0), (b, 1.0), (c, 1.0)],
            ConstraintSense::LessEqual,
            2.0,
        );
        model
    }

    #[test]
    fn test_assignment_model_is_optimal() {
        let instance = instance(4, 3);
        let model = ModelBuilder::new(&instance).build().unwrap();

        let summary = BranchAndBoundSolver::new()
            .solve(model, &SolveConfig::default())
            .unwrap();

        assert_eq!(summary.status, SolveStatus::Optimal);
        assert_eq!(summary.lower_bound, Some(4.0));
        assert_eq!(summary.upper_bound, Some(4.0));
        assert_eq!(summary.gap, Some(0.0));
        assert!(summary.nodes > 0);
    }

    #[test]
    fn test_agrees_with_decomposition() {
        let instance = instance(3, 4);
        let cost = TimeWeightedCost::new(5.0)
            .with_weight("T2", 1.0)
            .with_weight("T3", 2.0);
        for sense in [ObjectiveSense::Minimize, ObjectiveSense::Maximize] {
            let model = ModelBuilder::new(&instance)
                .with_sense(sense)
                .with_cost(&cost)
                .build()
                .unwrap();
            let exact = DecompositionSolver::new()
                .solve(model.clone(), &SolveConfig::default())
                .unwrap();
            let searched = BranchAndBoundSolver::new()
                .solve(model, &SolveConfig::default())
                .unwrap();
            assert_eq!(searched.status, SolveStatus::Optimal);
            assert_eq!(searched.upper_bound, exact.upper_bound);
        }
    }

    #[test]
    fn test_maximize_knapsack() {
        let summary = BranchAndBoundSolver::new()
            .solve(knapsack(), &SolveConfig::default())
            .unwrap();
        assert_eq!(summary.status, SolveStatus::Optimal);
        assert_eq!(summary.upper_bound, Some(4.0));
    }

    #[test]
    fn test_node_limit_leaves_gap() {
        let summary = BranchAndBoundSolver::new()
            .with_node_limit(5)
            .solve(pick_one_of_three(), &SolveConfig::default())
            .unwrap();

        assert_eq!(summary.status, SolveStatus::Feasible);
        assert_eq!(summary.nodes, 5);
        assert_eq!(summary.lower_bound, Some(-7.0));
        assert_eq!(summary.upper_bound, Some(-3.0));
        assert!((summary.gap.unwrap() - 400.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_node_limit_without_incumbent() {
        let instance = instance(2, 2);
        let model = ModelBuilder::new(&instance).build().unwrap();

        let summary = BranchAndBoundSolver::new()
            .with_node_limit(1)
            .solve(model, &SolveConfig::default())
            .unwrap();

        assert_eq!(summary.status, SolveStatus::NoSolution);
        assert_eq!(summary.lower_bound, Some(2.0));
        assert_eq!(summary.upper_bound, None);
        assert_eq!(summary.gap, None);
    }

    #[test]
    fn test_zero_time_limit_reports_root_bound() {
        let config = SolveConfig::new().with_time_limit(Duration::ZERO);
        let summary = BranchAndBoundSolver::new()
            .solve(knapsack(), &config)
            .unwrap();

        assert_eq!(summary.status, SolveStatus::NoSolution);
        assert_eq!(summary.nodes, 0);
        // Maximization: the bound sits above any incumbent.
        assert_eq!(summary.lower_bound, Some(7.0));
    }

    #[test]
    fn test_infeasible_model() {
        let mut model = OptimizationModel::new("impossible", ObjectiveSense::Minimize);
        let a = model.add_variable("a", 1.0);
        let b = model.add_variable("b", 1.0);
        model.add_constraint(
            "too_many",
            vec![(a, 1.0), (b, 1.0)],
            ConstraintSense::GreaterEqual,
            3.0,
        );

        let summary = BranchAndBoundSolver::new()
            .solve(model, &SolveConfig::default())
            .unwrap();
        assert_eq!(summary.status, SolveStatus::Infeasible);
        assert_eq!(summary.lower_bound, None);
        assert_eq!(summary.upper_bound, None);
    }

    #[test]
    fn test_infeasible_after_branching() {
        // x + y = 1 and x + y <= 0 only conflict once the search runs.
        let mut model = OptimizationModel::new("conflict", ObjectiveSense::Minimize);
        let x = model.add_variable("x", 1.0);
        let y = model.add_variable("y", 2.0);
        model.add_constraint("one", vec![(x, 1.0), (y, 1.0)], ConstraintSense::Equal, 1.0);
        model.add_constraint(
            "none",
            vec![(x, 1.0), (y, 1.0)],
            ConstraintSense::LessEqual,
            0.0,
        );

        let summary = BranchAndBoundSolver::new()
            .solve(model, &SolveConfig::default())
            .unwrap();
        assert_eq!(summary.status, SolveStatus::Infeasible);
        assert!(summary.nodes > 0);
    }

    #[test]
    fn test_zero_node_limit_is_init_error() {
        let err = BranchAndBoundSolver::new()
            .with_node_limit(0)
            .solve(knapsack(), &SolveConfig::default())
            .unwrap_err();
        assert_eq!(err.stage(), "init");
    }

    #[test]
    fn test_dangling_variable_is_build_error() {
        let mut model = knapsack();
        model.add_constraint("bad", vec![(VarId(42), 1.0)], ConstraintSense::LessEqual, 1.0);
        let err = BranchAndBoundSolver::new()
            .solve(model, &SolveConfig::default())
            .unwrap_err();
        assert!(matches!(err, SolverError::Build { .. }));
    }

    #[test]
    fn test_incumbent_is_feasible() {
        let mut model = OptimizationModel::new("mixed", ObjectiveSense::Minimize);
        let v: Vec<_> = (0..6)
            .map(|i| model.add_variable(format!("v{}", i), [4.0, -1.0, 3.0, -2.0, 5.0, 1.0][i]))
            .collect();
        model.add_constraint(
            "g1",
            vec![(v[0], 1.0), (v[1], 1.0), (v[2], 1.0)],
            ConstraintSense::Equal,
            1.0,
        );
        model.add_constraint(
            "cover",
            vec![(v[3], 1.0), (v[4], 1.0), (v[5], 1.0)],
            ConstraintSense::GreaterEqual,
            2.0,
        );
        model.add_constraint(
            "link",
            vec![(v[1], 1.0), (v[3], 1.0)],
            ConstraintSense::LessEqual,
            1.0,
        );

        let summary = BranchAndBoundSolver::new()
            .solve(model, &SolveConfig::default())
            .unwrap();
        assert_eq!(summary.status, SolveStatus::Optimal);
        // Best: v1 (-1) with v4 + v5 (6) = 5, or v2 (3) with v3 + v5 (-1) = 2.
        assert_eq!(summary.upper_bound, Some(2.0));
    }
}
