//! Tests for the assignment model builder.

use super::*;
use crate::error::BuildError;
use crate::instance::{Event, Instance, Resource, Time};

fn instance(events: usize, times: usize) -> Instance {
    Instance::new(
        format!("{}x{}", events, times),
        (1..=times)
            .map(|t| Time::new(format!("T{}", t), ""))
            .collect(),
        vec![Resource::class("R1", "1A"), Resource::teacher("R2", "Alice")],
        (1..=events)
            .map(|e| Event::new(format!("E{}", e), "", 1, "R1", "R2"))
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_two_by_two_scenario() {
    let model = ModelBuilder::new(&instance(2, 2)).build().unwrap();

    assert_eq!(model.num_variables(), 4);
    assert_eq!(model.num_constraints(), 2);
    assert_eq!(model.sense(), ObjectiveSense::Minimize);

    for (e, constraint) in model.constraints().iter().enumerate() {
        assert_eq!(constraint.sense, ConstraintSense::Equal);
        assert_eq!(constraint.rhs, 1.0);
        let vars: Vec<_> = constraint.terms.iter().map(|&(v, _)| v).collect();
        assert_eq!(
            vars,
            [
                model.assignment_var(e, 0).unwrap(),
                model.assignment_var(e, 1).unwrap()
            ]
        );
        assert!(constraint.terms.iter().all(|&(_, c)| c == 1.0));
        assert!(constraint.is_choose_one());
    }

    assert_eq!(model.constraints()[0].name, "assign_E1");
    assert_eq!(model.variables()[3].name, "x_E2_T2");
    assert!(model.variables().iter().all(|v| v.cost == 1.0));
}

#[test]
fn test_dimensions_scale() {
    for (events, times) in [(1, 1), (3, 5), (7, 2)] {
        let model = ModelBuilder::new(&instance(events, times)).build().unwrap();
        assert_eq!(model.num_variables(), events * times);
        assert_eq!(model.num_constraints(), events);
        assert_eq!(
            model.stats(),
            ModelStats {
                variables: events * times,
                constraints: events,
                nonzeros: events * times,
            }
        );
    }
}

#[test]
fn test_no_events() {
    let empty = Instance::new(
        "empty",
        vec![Time::new("T1", "")],
        vec![Resource::class("R1", "")],
        vec![],
    )
    .unwrap();
    assert_eq!(
        ModelBuilder::new(&empty).build().unwrap_err(),
        BuildError::NoEvents("empty".to_string())
    );
}

#[test]
fn test_no_times() {
    let no_times = Instance::new(
        "timeless",
        vec![],
        vec![Resource::class("R1", ""), Resource::teacher("R2", "")],
        vec![Event::new("E1", "", 1, "R1", "R2")],
    )
    .unwrap();
    assert_eq!(
        ModelBuilder::new(&no_times).build().unwrap_err(),
        BuildError::NoTimes("timeless".to_string())
    );
}

#[test]
fn test_custom_cost_and_sense() {
    let cost = |e: &Event, t: &Time| {
        let e: f64 = e.id[1..].parse().unwrap();
        let t: f64 = t.id[1..].parse().unwrap();
        10.0 * e + t
    };
    let model = ModelBuilder::new(&instance(2, 3))
        .with_cost(&cost)
        .with_sense(ObjectiveSense::Maximize)
        .build()
        .unwrap();

    assert_eq!(model.sense(), ObjectiveSense::Maximize);
    let x = model.assignment_var(1, 2).unwrap();
    assert_eq!(model.variable(x).unwrap().cost, 23.0);
}

#[test]
fn test_time_weighted_cost() {
    let cost = TimeWeightedCost::new(2.0).with_weight("T2", 5.0);
    let model = ModelBuilder::new(&instance(1, 3))
        .with_cost(&cost)
        .build()
        .unwrap();
    let costs: Vec<_> = model.variables().iter().map(|v| v.cost).collect();
    assert_eq!(costs, [2.0, 5.0, 2.0]);
}

#[test]
fn test_non_finite_cost() {
    let cost = |_: &Event, t: &Time| if t.id == "T2" { f64::NAN } else { 1.0 };
    let err = ModelBuilder::new(&instance(1, 2))
        .with_cost(&cost)
        .build()
        .unwrap_err();
    assert!(matches!(err, BuildError::NonFiniteCost { ref time, .. } if time == "T2"));
}

#[test]
fn test_instance_not_mutated() {
    let original = instance(2, 2);
    let copy = original.clone();
    let _ = ModelBuilder::new(&original).build().unwrap();
    assert_eq!(original.events(), copy.events());
    assert_eq!(original.times(), copy.times());
}

#[test]
fn test_feasibility_and_objective() {
    let model = ModelBuilder::new(&instance(2, 2)).build().unwrap();
    assert!(model.is_feasible(&[true, false, false, true], 1e-9));
    assert!(!model.is_feasible(&[true, true, false, true], 1e-9));
    assert!(!model.is_feasible(&[false, false, false, true], 1e-9));
    assert!(!model.is_feasible(&[true, false], 1e-9));
    assert_eq!(model.objective_value(&[true, false, false, true]), 2.0);
}

#[test]
fn test_assignment_var_bounds() {
    let model = ModelBuilder::new(&instance(2, 3)).build().unwrap();
    assert_eq!(model.assignment_var(1, 0), Some(VarId(3)));
    assert_eq!(model.assignment_var(2, 0), None);
    assert_eq!(model.assignment_var(0, 3), None);

    let hand_built = OptimizationModel::new("manual", ObjectiveSense::Minimize);
    assert_eq!(hand_built.assignment_var(0, 0), None);
}

#[test]
fn test_sense_parsing() {
    assert_eq!("max".parse::<ObjectiveSense>(), Ok(ObjectiveSense::Maximize));
    assert_eq!(
        "Minimize".parse::<ObjectiveSense>(),
        Ok(ObjectiveSense::Minimize)
    );
    assert!("sideways".parse::<ObjectiveSense>().is_err());
    assert!(ObjectiveSense::Maximize.is_better(2.0, 1.0));
    assert!(ObjectiveSense::Minimize.is_better(1.0, 2.0));
}
