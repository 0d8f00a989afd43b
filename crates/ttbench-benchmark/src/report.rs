//! Comparison tables for benchmark results.
//!
//! [`ComparisonReport::from_result`] turns a [`BenchmarkResult`] into one row
//! per instance and a trailing `MEAN` row. Each backend contributes four
//! columns: lower bound, upper bound, gap in percent and solve time in
//! seconds. Rendering never touches the filesystem.

use std::fmt::{self, Write as _};

use ttbench_solver::SolutionSummary;

use crate::result::BenchmarkResult;

/// Label of the aggregate row.
pub const MEAN_LABEL: &str = "MEAN";

/// Text shown for a missing value.
pub const ABSENT: &str = "-";

/// The four values one backend reports for one instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportCell {
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    /// Percent.
    pub gap: Option<f64>,
    /// Seconds.
    pub time: Option<f64>,
}

impl ReportCell {
    /// Reads a summary; failed runs and missing summaries are all absent.
    pub fn from_summary(summary: Option<&SolutionSummary>) -> Self {
        match summary {
            Some(s) if !s.is_failed() => Self {
                lower_bound: s.lower_bound,
                upper_bound: s.upper_bound,
                gap: s.gap,
                time: Some(s.solve_secs()),
            },
            _ => Self::default(),
        }
    }

    /// Values in column order.
    pub fn values(&self) -> [Option<f64>; 4] {
        [self.lower_bound, self.upper_bound, self.gap, self.time]
    }

    fn from_values(values: [Option<f64>; 4]) -> Self {
        let [lower_bound, upper_bound, gap, time] = values;
        Self {
            lower_bound,
            upper_bound,
            gap,
            time,
        }
    }
}

/// One table row: an instance, or the `MEAN` aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    /// One cell per backend, in backend order.
    pub cells: Vec<ReportCell>,
}

/// Per-instance comparison across backends, with a mean row.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ttbench_benchmark::{BenchmarkResult, ComparisonReport, InstanceResult};
/// use ttbench_core::{ModelStats, ObjectiveSense};
/// use ttbench_solver::{SolutionSummary, SolveStatus};
///
/// let mut result = BenchmarkResult::new("Demo", ObjectiveSense::Minimize, vec!["bnb".into()]);
/// for (name, lb, ub) in [("i1", 80.0, 100.0), ("i2", 50.0, 50.0)] {
///     let mut instance = InstanceResult::new(name, ModelStats::default(), Duration::ZERO);
///     instance.add_summary(
///         SolutionSummary::from_bounds("bnb", SolveStatus::Feasible, lb, ub)
///             .with_solve_time(Duration::from_secs(2)),
///     );
///     result.add_instance(instance);
/// }
///
/// let report = ComparisonReport::from_result(&result);
/// let mean = report.mean.cells[0];
/// assert_eq!(mean.lower_bound, Some(65.0));
/// assert!((mean.gap.unwrap() - 10.0).abs() < 1e-9);
/// assert!(report.to_csv().starts_with("instance,bnb.lb,bnb.ub,bnb.gap%,bnb.time\n"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub title: String,
    pub backends: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub mean: ReportRow,
}

impl ComparisonReport {
    /// Builds the table. Pure; the result is not modified.
    pub fn from_result(result: &BenchmarkResult) -> Self {
        let rows: Vec<ReportRow> = result
            .instances
            .iter()
            .map(|instance| ReportRow {
                label: instance.name.clone(),
                cells: (0..result.backends.len())
                    .map(|b| ReportCell::from_summary(instance.summary_at(b)))
                    .collect(),
            })
            .collect();

        let mean = ReportRow {
            label: MEAN_LABEL.to_string(),
            cells: (0..result.backends.len())
                .map(|b| {
                    let mut values = [None; 4];
                    for (column, slot) in values.iter_mut().enumerate() {
                        *slot = mean(rows.iter().map(|row| row.cells[b].values()[column]));
                    }
                    ReportCell::from_values(values)
                })
                .collect(),
        };

        Self {
            title: result.name.clone(),
            backends: result.backends.clone(),
            rows,
            mean,
        }
    }

    /// Instance rows followed by the mean row.
    pub fn all_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().chain(std::iter::once(&self.mean))
    }

    /// Tab-separated table with a two-line header, two decimals throughout.
    ///
    /// ```text
    /// Results: school
    /// Instance	bnb				decomposition
    /// 	LB	UB	GAP (%)	TIME	LB	UB	GAP (%)	TIME
    /// i1	2.00	2.00	0.00	0.01	2.00	2.00	0.00	0.00
    /// MEAN	2.00	2.00	0.00	0.01	2.00	2.00	0.00	0.00
    /// ```
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "Results: {}", self.title);

        output.push_str("Instance");
        for backend in &self.backends {
            let _ = write!(output, "\t{}\t\t\t", backend);
        }
        output.push('\n');
        for _ in &self.backends {
            output.push_str("\tLB\tUB\tGAP (%)\tTIME");
        }
        output.push('\n');

        for row in self.all_rows() {
            output.push_str(&row.label);
            for value in row.cells.iter().flat_map(ReportCell::values) {
                output.push('\t');
                output.push_str(&format_fixed(value));
            }
            output.push('\n');
        }

        output
    }

    /// Markdown table with the mean row in bold.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# Benchmark: {}", self.title);
        let _ = writeln!(output);

        output.push_str("| Instance |");
        for backend in &self.backends {
            let _ = write!(
                output,
                " {b} LB | {b} UB | {b} GAP (%) | {b} TIME (s) |",
                b = backend
            );
        }
        output.push('\n');
        output.push_str("|----------|");
        for _ in &self.backends {
            output.push_str("---:|---:|---:|---:|");
        }
        output.push('\n');

        for row in &self.rows {
            let _ = write!(output, "| {} |", row.label);
            for value in row.cells.iter().flat_map(ReportCell::values) {
                let _ = write!(output, " {} |", format_fixed(value));
            }
            output.push('\n');
        }

        let _ = write!(output, "| **{}** |", self.mean.label);
        for value in self.mean.cells.iter().flat_map(ReportCell::values) {
            let _ = write!(output, " **{}** |", format_fixed(value));
        }
        output.push('\n');

        output
    }

    /// Comma-separated table with full-precision numbers.
    ///
    /// Columns: `instance`, then `<backend>.lb`, `<backend>.ub`,
    /// `<backend>.gap%`, `<backend>.time` per backend.
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str("instance");
        for backend in &self.backends {
            let b = csv_field(backend);
            let _ = write!(output, ",{b}.lb,{b}.ub,{b}.gap%,{b}.time");
        }
        output.push('\n');

        for row in self.all_rows() {
            output.push_str(&csv_field(&row.label));
            for value in row.cells.iter().flat_map(ReportCell::values) {
                output.push(',');
                match value {
                    Some(v) => {
                        let _ = write!(output, "{}", v);
                    }
                    None => output.push_str(ABSENT),
                }
            }
            output.push('\n');
        }

        output
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Arithmetic mean of the present, finite values; `None` if there are none.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn format_fixed(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => ABSENT.to_string(),
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
