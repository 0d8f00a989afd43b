//! Tests for the benchmark runner.

use std::sync::Arc;
use std::time::Duration;

use ttbench_core::{ObjectiveSense, OptimizationModel};
use ttbench_solver::{
    BranchAndBoundSolver, DecompositionSolver, SolutionSummary, SolveConfig, SolveStatus,
    SolverAdapter, SolverError,
};
use ttbench_test::{
    grid_instance, two_by_two, FailingAdapter, ScriptedAdapter, SAMPLE_TEXT, SAMPLE_XML,
};

use super::*;
use crate::ComparisonReport;

/// Lets a test keep a handle on an adapter owned by the benchmark.
struct Shared<A>(Arc<A>);

impl<A: SolverAdapter> SolverAdapter for Shared<A> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn solve(
        &self,
        model: OptimizationModel,
        config: &SolveConfig,
    ) -> Result<SolutionSummary, SolverError> {
        self.0.solve(model, config)
    }
}

#[test]
fn test_runs_every_pair_in_order() {
    let first = Arc::new(ScriptedAdapter::optimal("first", 2.0));
    let second = Arc::new(ScriptedAdapter::optimal("second", 2.0));
    let benchmark = Benchmark::new(RunConfig::new("order"), Vec::new())
        .with_adapter(Shared(first.clone()))
        .with_adapter(Shared(second.clone()));

    let result = benchmark.run(vec![grid_instance("a", 2, 3), grid_instance("b", 4, 1)]);

    assert_eq!(result.backends, vec!["first", "second"]);
    assert_eq!(result.instance_count(), 2);
    assert_eq!(result.run_count(), 4);
    assert_eq!(
        first.seen_models(),
        vec![("a".to_string(), 6), ("b".to_string(), 4)]
    );
    assert_eq!(second.calls(), 2);
    let a = result.instance("a").unwrap();
    assert_eq!(a.stats.unwrap().variables, 6);
    assert_eq!(a.summaries[0].backend, "first");
    assert_eq!(a.summaries[1].backend, "second");
}

#[test]
fn test_failing_adapter_does_not_stop_later_pairs() {
    let failing = Arc::new(FailingAdapter::optimize("broken", "segfault"));
    let after = Arc::new(ScriptedAdapter::optimal("after", 2.0));
    let benchmark = Benchmark::new(RunConfig::new("failures"), Vec::new())
        .with_adapter(Shared(failing.clone()))
        .with_adapter(Shared(after.clone()));

    let result = benchmark.run(vec![two_by_two(), grid_instance("g", 1, 1)]);

    assert_eq!(failing.calls(), 2);
    assert_eq!(after.calls(), 2);
    assert_eq!(result.failed_runs(), 2);

    let summary = result.instance("two_by_two").unwrap().summary("broken").unwrap();
    assert_eq!(summary.status, SolveStatus::Failed);
    assert_eq!(summary.lower_bound, None);
    assert_eq!(summary.upper_bound, None);
    assert_eq!(summary.gap, None);
    assert!(summary.failure.as_deref().unwrap().contains("segfault"));

    let ok = result.instance("two_by_two").unwrap().summary("after").unwrap();
    assert_eq!(ok.status, SolveStatus::Optimal);
}

#[test]
fn test_build_failure_skips_instance_only() {
    let adapter = Arc::new(ScriptedAdapter::optimal("fake", 1.0));
    let benchmark =
        Benchmark::new(RunConfig::new("build"), Vec::new()).with_adapter(Shared(adapter.clone()));

    let result = benchmark.run(vec![grid_instance("empty", 0, 3), grid_instance("ok", 1, 1)]);

    let empty = result.instance("empty").unwrap();
    assert!(empty.is_failed());
    assert!(empty.summaries.is_empty());
    assert!(empty.stats.is_none());
    assert!(!result.instance("ok").unwrap().is_failed());
    assert_eq!(adapter.calls(), 1);
}

#[test]
fn test_load_failure_skips_instance_only() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("school.txt");
    std::fs::write(&good, SAMPLE_TEXT).unwrap();
    let bad = dir.path().join("broken.txt");
    std::fs::write(&bad, "Events:\nE1, Maths\n").unwrap();
    let missing = dir.path().join("missing.txt");

    let benchmark = Benchmark::new(RunConfig::new("files"), Vec::new())
        .with_adapter(DecompositionSolver::new());
    let result = benchmark.run(vec![bad, missing, good]);

    assert_eq!(result.instance_count(), 3);
    assert!(result.instance("broken").unwrap().error.as_deref().unwrap().contains("line 2"));
    assert!(result.instance("missing").unwrap().is_failed());

    let school = result.instance("school").unwrap();
    let summary = school.summary("decomposition").unwrap();
    assert_eq!(summary.upper_bound, Some(2.0));
}

#[test]
fn test_xml_and_text_files_give_the_same_model() {
    let dir = tempfile::tempdir().unwrap();
    let xml = dir.path().join("BrazilInstance1.xml");
    std::fs::write(&xml, SAMPLE_XML).unwrap();
    let text = dir.path().join("school.txt");
    std::fs::write(&text, SAMPLE_TEXT).unwrap();

    let adapter = Arc::new(ScriptedAdapter::optimal("fake", 2.0));
    let benchmark =
        Benchmark::new(RunConfig::new("formats"), Vec::new()).with_adapter(Shared(adapter.clone()));
    let result = benchmark.run(vec![xml, text]);

    assert_eq!(result.failed_instances(), 0);
    assert_eq!(
        adapter.seen_models(),
        vec![
            ("BrazilInstance1".to_string(), 4),
            ("school".to_string(), 4)
        ]
    );
    assert_eq!(
        result.instance("BrazilInstance1").unwrap().stats,
        result.instance("school").unwrap().stats
    );
}

#[test]
fn test_backends_sharing_a_name_keep_their_own_columns() {
    let benchmark = Benchmark::new(RunConfig::new("limits"), Vec::new())
        .with_adapter(BranchAndBoundSolver::new().with_node_limit(1))
        .with_adapter(BranchAndBoundSolver::new());

    let result = benchmark.run(vec![grid_instance("g", 4, 3)]);
    let g = result.instance("g").unwrap();
    assert_eq!(g.summary_at(0).unwrap().status, SolveStatus::NoSolution);
    assert_eq!(g.summary_at(1).unwrap().status, SolveStatus::Optimal);

    let report = ComparisonReport::from_result(&result);
    assert_eq!(report.backends, vec!["branch-and-bound", "branch-and-bound"]);
    assert_eq!(report.rows[0].cells[0].upper_bound, None);
    assert_eq!(report.rows[0].cells[1].upper_bound, Some(4.0));
}

#[test]
fn test_time_limit_and_sense_pass_through() {
    let adapter = Arc::new(ScriptedAdapter::optimal("fake", 0.0));
    let config = RunConfig::new("limits")
        .with_sense(ObjectiveSense::Maximize)
        .with_time_limit(Duration::from_secs(7));
    let benchmark = Benchmark::new(config, Vec::new()).with_adapter(Shared(adapter.clone()));

    let result = benchmark.run(vec![two_by_two()]);

    assert_eq!(result.sense, ObjectiveSense::Maximize);
    assert_eq!(adapter.seen_time_limits(), vec![Some(Duration::from_secs(7))]);
}

#[test]
fn test_solve_time_is_measured_by_harness() {
    let adapter = ScriptedAdapter::optimal("slow", 1.0).with_delay(Duration::from_millis(20));
    let benchmark = Benchmark::new(RunConfig::new("timing"), Vec::new()).with_adapter(adapter);

    let result = benchmark.run(vec![grid_instance("g", 1, 1)]);

    let summary = result.instance("g").unwrap().summary("slow").unwrap();
    assert!(summary.solve_time >= Duration::from_millis(20));
    assert!(result.total_time >= summary.solve_time);
}

#[test]
fn test_from_config() {
    let config = BenchmarkConfig::new()
        .with_name("configured")
        .with_backend("decomposition")
        .with_backend("bnb")
        .with_node_limit(100);

    let benchmark = Benchmark::from_config(&config).unwrap();

    assert_eq!(benchmark.config().name(), "configured");
    assert_eq!(
        benchmark.backend_names(),
        vec!["decomposition", "branch-and-bound"]
    );

    let result = benchmark.run(vec![two_by_two()]);
    for summary in &result.instances[0].summaries {
        assert_eq!(summary.status, SolveStatus::Optimal);
        assert_eq!(summary.upper_bound, Some(2.0));
    }
}

#[test]
fn test_from_config_rejects_unknown_backend() {
    let config = BenchmarkConfig::new().with_backend("cplex");
    let err = Benchmark::from_config(&config).unwrap_err();
    assert_eq!(err.backend(), "cplex");
}

#[test]
fn test_case_names() {
    assert_eq!(BenchmarkCase::from(two_by_two()).name(), "two_by_two");
    assert_eq!(
        BenchmarkCase::from(PathBuf::from("/data/BrazilInstance1.txt")).name(),
        "BrazilInstance1"
    );
}
