//! ttbench Core - Timetabling instances and their optimization models
//!
//! This crate provides the fundamental abstractions for ttbench:
//! - Validated, read-only timetabling instances (times, resources, events)
//! - The assignment-formulation model builder
//! - A backend-agnostic optimization model and its LP-format rendering

pub mod error;
pub mod instance;
pub mod model;

pub use error::{BuildError, ValidationError};
pub use instance::{Event, Instance, Resource, ResourceKind, Time};
pub use model::{
    write_lp, ConstraintSense, CostFunction, LinearConstraint, ModelBuilder, ModelStats,
    ObjectiveSense, OptimizationModel, TimeWeightedCost, UniformCost, VarId, Variable,
};
