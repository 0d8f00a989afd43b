//! Assignment formulation.
//!
//! One binary `x[e][t]` per event and time, meaning "event `e` starts at
//! time `t`", and one `Σ_t x[e][t] = 1` row per event. Nothing else is
//! generated: clash avoidance, duration spanning and capacity rows are not
//! part of this formulation.

use crate::error::BuildError;
use crate::instance::Instance;

use super::cost::{CostFunction, UniformCost};
use super::{AssignmentShape, ConstraintSense, ObjectiveSense, OptimizationModel, VarId};

static UNIT_COST: UniformCost = UniformCost(1.0);

/// Builds an [`OptimizationModel`] from an [`Instance`].
///
/// # Example
///
/// ```
/// use ttbench_core::{Event, Instance, ModelBuilder, ObjectiveSense, Resource, Time};
///
/// let instance = Instance::new(
///     "tiny",
///     vec![Time::new("T1", ""), Time::new("T2", "")],
///     vec![Resource::class("R1", ""), Resource::teacher("R2", "")],
///     vec![
///         Event::new("E1", "", 1, "R1", "R2"),
///         Event::new("E2", "", 1, "R1", "R2"),
///     ],
/// )
/// .unwrap();
///
/// let model = ModelBuilder::new(&instance)
///     .with_sense(ObjectiveSense::Minimize)
///     .build()
///     .unwrap();
///
/// assert_eq!(model.num_variables(), 4);
/// assert_eq!(model.num_constraints(), 2);
/// ```
pub struct ModelBuilder<'a> {
    instance: &'a Instance,
    sense: ObjectiveSense,
    cost: &'a dyn CostFunction,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder with unit costs and minimization.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            sense: ObjectiveSense::Minimize,
            cost: &UNIT_COST,
        }
    }

    pub fn with_sense(mut self, sense: ObjectiveSense) -> Self {
        self.sense = sense;
        self
    }

    /// Replaces the default unit cost.
    pub fn with_cost(mut self, cost: &'a dyn CostFunction) -> Self {
        self.cost = cost;
        self
    }

    /// Generates variables, objective and assignment rows.
    ///
    /// # Errors
    ///
    /// [`BuildError::NoEvents`] / [`BuildError::NoTimes`] for degenerate
    /// instances, [`BuildError::NonFiniteCost`] if the cost function returns
    /// NaN or an infinity.
    pub fn build(&self) -> Result<OptimizationModel, BuildError> {
        let instance = self.instance;
        if instance.event_count() == 0 {
            return Err(BuildError::NoEvents(instance.name().to_string()));
        }
        if instance.time_count() == 0 {
            return Err(BuildError::NoTimes(instance.name().to_string()));
        }

        let mut model = OptimizationModel::new(instance.name(), self.sense);
        model.variables.reserve(instance.event_count() * instance.time_count());

        for event in instance.events() {
            for time in instance.times() {
                let cost = self.cost.cost(event, time);
                if !cost.is_finite() {
                    return Err(BuildError::NonFiniteCost {
                        event: event.id.clone(),
                        time: time.id.clone(),
                        cost,
                    });
                }
                model.add_variable(format!("x_{}_{}", event.id, time.id), cost);
            }
        }

        let times = instance.time_count();
        for (e, event) in instance.events().iter().enumerate() {
            let terms = (0..times).map(|t| (VarId(e * times + t), 1.0)).collect();
            model.add_constraint(
                format!("assign_{}", event.id),
                terms,
                ConstraintSense::Equal,
                1.0,
            );
        }

        model.set_shape(AssignmentShape {
            events: instance.event_count(),
            times,
        });
        Ok(model)
    }
}
