//! End-to-end tests of the `ttbench` binary with console output enabled.

use std::path::Path;
use std::process::{Command, Output};

use ttbench_test::{SAMPLE_TEXT, SAMPLE_XML};

fn ttbench(args: &[&str], dir: &Path) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_ttbench"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "ttbench {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

#[test]
fn test_run_json_stdout_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("school.txt"), SAMPLE_TEXT).unwrap();

    let output = ttbench(
        &["run", "--format", "json", "--backend", "decomposition", "school.txt"],
        dir.path(),
    );

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["backends"][0], "decomposition");
    assert_eq!(result["instances"][0]["name"], "school");
    assert!(String::from_utf8_lossy(&output.stderr).contains("v0."));
}

#[test]
fn test_run_csv_stdout_has_only_the_table() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("BrazilInstance1.xml"), SAMPLE_XML).unwrap();

    let output = ttbench(
        &["run", "--format", "csv", "--backend", "decomposition", "BrazilInstance1.xml"],
        dir.path(),
    );

    let csv = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("instance,decomposition.lb"));
    assert!(lines[1].starts_with("BrazilInstance1,2,2,0,"));
    assert!(lines[2].starts_with("MEAN,"));
}

#[test]
fn test_export_stdout_is_an_lp_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("school.txt"), SAMPLE_TEXT).unwrap();

    let output = ttbench(&["export", "school.txt"], dir.path());

    let lp = String::from_utf8(output.stdout).unwrap();
    assert!(lp.starts_with("\\ Problem: school"));
    assert!(lp.ends_with("End\n"));
}
