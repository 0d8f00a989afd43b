//! Backend-agnostic optimization models.
//!
//! An [`OptimizationModel`] is a pure 0-1 linear program: binary variables
//! with objective coefficients, and linear constraints over them. It is the
//! only thing solver backends ever see; the instance it came from stays with
//! the caller.
//!
//! The assignment formulation lives in [`ModelBuilder`]. Models can also be
//! assembled by hand with [`OptimizationModel::add_variable`] and
//! [`OptimizationModel::add_constraint`].

mod builder;
mod cost;
mod lp;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

pub use builder::ModelBuilder;
pub use cost::{CostFunction, TimeWeightedCost, UniformCost};
pub use lp::write_lp;

/// Direction of optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}

impl ObjectiveSense {
    /// Returns true if `a` is strictly better than `b` under this sense.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            ObjectiveSense::Minimize => a < b,
            ObjectiveSense::Maximize => a > b,
        }
    }
}

impl fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveSense::Minimize => f.write_str("minimize"),
            ObjectiveSense::Maximize => f.write_str("maximize"),
        }
    }
}

impl FromStr for ObjectiveSense {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimize" => Ok(ObjectiveSense::Minimize),
            "max" | "maximize" => Ok(ObjectiveSense::Maximize),
            other => Err(format!("unknown optimization sense '{}'", other)),
        }
    }
}

/// Index of a variable inside its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A binary decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Objective coefficient.
    pub cost: f64,
}

/// Relation between a constraint's activity and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    Equal,
    LessEqual,
    GreaterEqual,
}

impl ConstraintSense {
    /// Operator as written in LP files.
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintSense::Equal => "=",
            ConstraintSense::LessEqual => "<=",
            ConstraintSense::GreaterEqual => ">=",
        }
    }
}

/// `Σ coefficient · x  (=|<=|>=)  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(VarId, f64)>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Returns true for `Σ x = 1` with unit coefficients.
    pub fn is_choose_one(&self) -> bool {
        self.sense == ConstraintSense::Equal
            && self.rhs == 1.0
            && !self.terms.is_empty()
            && self.terms.iter().all(|&(_, c)| c == 1.0)
    }

    /// Evaluates the left-hand side for a full assignment.
    pub fn activity(&self, values: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(var, _)| values[var.index()])
            .map(|&(_, c)| c)
            .sum()
    }

    /// Checks the constraint against a full assignment within `tolerance`.
    pub fn is_satisfied(&self, values: &[bool], tolerance: f64) -> bool {
        let activity = self.activity(values);
        match self.sense {
            ConstraintSense::Equal => (activity - self.rhs).abs() <= tolerance,
            ConstraintSense::LessEqual => activity <= self.rhs + tolerance,
            ConstraintSense::GreaterEqual => activity >= self.rhs - tolerance,
        }
    }
}

/// Size of a model, for logging and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelStats {
    pub variables: usize,
    pub constraints: usize,
    pub nonzeros: usize,
}

/// Event-major layout of an assignment model: `index = event * times + time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AssignmentShape {
    pub(crate) events: usize,
    pub(crate) times: usize,
}

/// A 0-1 linear program ready to be submitted to a solver backend.
///
/// # Example
///
/// ```
/// use ttbench_core::{ConstraintSense, ObjectiveSense, OptimizationModel};
///
/// let mut model = OptimizationModel::new("knapsack", ObjectiveSense::Maximize);
/// let a = model.add_variable("a", 3.0);
/// let b = model.add_variable("b", 2.0);
/// model.add_constraint("cap", vec![(a, 2.0), (b, 1.0)], ConstraintSense::LessEqual, 2.0);
///
/// assert_eq!(model.num_variables(), 2);
/// assert_eq!(model.objective_value(&[true, false]), 3.0);
/// assert!(model.is_feasible(&[true, false], 1e-9));
/// assert!(!model.is_feasible(&[true, true], 1e-9));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationModel {
    name: String,
    sense: ObjectiveSense,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    shape: Option<AssignmentShape>,
}

impl OptimizationModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>, sense: ObjectiveSense) -> Self {
        Self {
            name: name.into(),
            sense,
            variables: Vec::new(),
            constraints: Vec::new(),
            shape: None,
        }
    }

    /// Adds a binary variable and returns its id.
    pub fn add_variable(&mut self, name: impl Into<String>, cost: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name: name.into(),
            cost,
        });
        id
    }

    /// Adds a linear constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(VarId, f64)>,
        sense: ConstraintSense,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Returns the variable `x[event][time]` of an assignment model.
    ///
    /// `None` for hand-built models or out-of-range positions.
    pub fn assignment_var(&self, event: usize, time: usize) -> Option<VarId> {
        let shape = self.shape?;
        (event < shape.events && time < shape.times).then(|| VarId(event * shape.times + time))
    }

    /// Objective value of a full assignment.
    pub fn objective_value(&self, values: &[bool]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .filter(|(_, &v)| v)
            .map(|(var, _)| var.cost)
            .sum()
    }

    /// Checks every constraint against a full assignment.
    pub fn is_feasible(&self, values: &[bool], tolerance: f64) -> bool {
        values.len() == self.variables.len()
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            variables: self.variables.len(),
            constraints: self.constraints.len(),
            nonzeros: self.constraints.iter().map(|c| c.terms.len()).sum(),
        }
    }

    pub(crate) fn set_shape(&mut self, shape: AssignmentShape) {
        self.shape = Some(shape);
    }
}
