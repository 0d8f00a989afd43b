//! Colorful console output for benchmark runs.
//!
//! Provides a custom `tracing` layer that renders the harness events with
//! colors: one line per instance, model and backend run, and a closing
//! summary box.
//!
//! Everything goes to stderr, so stdout stays free for reports and exports.
//!
//! ## Log Levels
//!
//! - **INFO**: Benchmark, instance and backend lifecycle
//! - **WARN**: Failed backends and instances
//! - **DEBUG**: Backend internals (search progress, parsed files)

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static RUN_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "ttbench=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and installs the colored layer behind an
/// [`EnvFilter`] read from `RUST_LOG`, [`DEFAULT_FILTER`] otherwise.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(BenchmarkConsoleLayer)
            .try_init();
    });
}

// Marks the start of the run for elapsed time tracking.
fn mark_run_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    RUN_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = RUN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
  _   _   _                     _
 | |_| |_| |__   ___ _ __   ___| |__
 | __| __| '_ \ / _ \ '_ \ / __| '_ \
 | |_| |_| |_) |  __/ | | | (__| | | |
  \__|\__|_.__/ \___|_| |_|\___|_| |_|
"#;

    let version_line = format!("         v{} - Timetabling MILP Benchmark\n", VERSION);

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", banner.bright_cyan());
    let _ = writeln!(stderr, "{}", version_line.bright_white().bold());
    let _ = stderr.flush();
}

/// A tracing layer that formats benchmark events with colors.
pub struct BenchmarkConsoleLayer;

impl<S: Subscriber> Layer<S> for BenchmarkConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("ttbench") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    name: Option<String>,
    instance: Option<String>,
    backend: Option<String>,
    status: Option<String>,
    stage: Option<String>,
    error: Option<String>,
    sense: Option<String>,
    index: Option<u64>,
    total: Option<u64>,
    instance_count: Option<u64>,
    backend_count: Option<u64>,
    variables: Option<u64>,
    constraints: Option<u64>,
    nonzeros: Option<u64>,
    nodes: Option<u64>,
    runs: Option<u64>,
    failures: Option<u64>,
    duration_ms: Option<u64>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    gap: Option<f64>,
    time_limit_secs: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "index" => self.index = Some(value),
            "total" => self.total = Some(value),
            "instance_count" => self.instance_count = Some(value),
            "backend_count" => self.backend_count = Some(value),
            "variables" => self.variables = Some(value),
            "constraints" => self.constraints = Some(value),
            "nonzeros" => self.nonzeros = Some(value),
            "nodes" => self.nodes = Some(value),
            "runs" => self.runs = Some(value),
            "failures" => self.failures = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN marks an absent value.
        let value = (!value.is_nan()).then_some(value);
        match field.name() {
            "lower_bound" => self.lower_bound = value,
            "upper_bound" => self.upper_bound = value,
            "gap" => self.gap = value,
            "time_limit_secs" => self.time_limit_secs = value,
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "name" => &mut self.name,
            "instance" => &mut self.instance,
            "backend" => &mut self.backend,
            "status" => &mut self.status,
            "stage" => &mut self.stage,
            "error" => &mut self.error,
            "sense" => &mut self.sense,
            _ => return,
        };
        *slot = Some(value.to_string());
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "benchmark_start" => format_benchmark_start(v),
        "benchmark_end" => format_benchmark_end(v),
        "instance_start" => format_instance_start(v),
        "instance_failed" => format_instance_failed(v),
        "model_built" => format_model_built(v),
        "backend_end" => format_backend_end(v),
        "backend_failed" => format_backend_failed(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_benchmark_start(v: &EventVisitor) -> String {
    mark_run_start();
    let name = v.name.as_deref().unwrap_or("benchmark");
    let instances = v.instance_count.unwrap_or(0);
    let backends = v.backend_count.unwrap_or(0);

    let mut output = format!(
        "{} {} {} │ {} instances │ {} backends",
        format_elapsed(),
        "▶".bright_green().bold(),
        name.white().bold(),
        format_count(instances).bright_yellow(),
        format_count(backends).bright_yellow(),
    );

    if let Some(sense) = v.sense.as_deref() {
        output.push_str(&format!(" │ {}", sense.bright_magenta()));
    }

    if let Some(limit) = v.time_limit_secs {
        output.push_str(&format!(" │ {}s limit", limit.bright_yellow()));
    }

    output
}

fn format_instance_start(v: &EventVisitor) -> String {
    let instance = v.instance.as_deref().unwrap_or("?");
    let position = match (v.index, v.total) {
        (Some(i), Some(n)) => format!("[{}/{}] ", i + 1, n),
        _ => String::new(),
    };

    format!(
        "{} {} {}{}",
        format_elapsed(),
        "▶".bright_blue(),
        position.bright_black(),
        instance.white().bold()
    )
}

fn format_model_built(v: &EventVisitor) -> String {
    format!(
        "{}   {} model │ {} vars │ {} rows │ {} nonzeros │ {}",
        format_elapsed(),
        "◆".bright_blue(),
        format_count(v.variables.unwrap_or(0)).bright_yellow(),
        format_count(v.constraints.unwrap_or(0)).bright_yellow(),
        format_count(v.nonzeros.unwrap_or(0)).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_backend_end(v: &EventVisitor) -> String {
    let backend = v.backend.as_deref().unwrap_or("?");
    let status = v.status.as_deref().unwrap_or("?");
    let status = match status {
        "optimal" => status.bright_green().bold().to_string(),
        "feasible" => status.bright_yellow().to_string(),
        _ => status.bright_red().to_string(),
    };

    let mut output = format!(
        "{}   {} {:<18} {} │ LB {} │ UB {} │ gap {} │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        backend.white().bold(),
        status,
        format_bound(v.lower_bound),
        format_bound(v.upper_bound),
        format_gap(v.gap),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    );

    if let Some(nodes) = v.nodes.filter(|&n| n > 0) {
        output.push_str(&format!(" │ {} nodes", format_count(nodes).bright_magenta()));
    }

    output
}

fn format_backend_failed(v: &EventVisitor) -> String {
    format!(
        "{}   {} {:<18} {} ({}) │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.backend.as_deref().unwrap_or("?").white().bold(),
        "FAILED".bright_red().bold(),
        v.stage.as_deref().unwrap_or("?"),
        v.error.as_deref().unwrap_or("").bright_red()
    )
}

fn format_instance_failed(v: &EventVisitor) -> String {
    format!(
        "{}   {} {} skipped │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.instance.as_deref().unwrap_or("?").white().bold(),
        v.error.as_deref().unwrap_or("").bright_red()
    )
}

fn format_benchmark_end(v: &EventVisitor) -> String {
    let instances = v.instance_count.unwrap_or(0);
    let runs = v.runs.unwrap_or(0);
    let failures = v.failures.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} Benchmark complete │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(duration).yellow()
    );

    let inner_width: usize = 58;
    let border = "═".repeat(inner_width);
    let line = |label: &str, value: String| {
        format!(
            "{}  {:<18}{:>36}  {}\n",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        )
    };

    output.push_str("\n\n");
    output.push_str(&format!("╔{}╗", border).bright_cyan().to_string());
    output.push('\n');
    output.push_str(&line("Instances:", format_count(instances)));
    output.push_str(&line("Backend runs:", format_count(runs)));
    output.push_str(&line("Failures:", format_count(failures)));
    output.push_str(&format!("╚{}╝", border).bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_bound(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v).white().to_string(),
        _ => "-".bright_black().to_string(),
    }
}

fn format_gap(value: Option<f64>) -> String {
    match value {
        Some(g) if g.is_finite() && g.abs() < 1e-9 => "0.00%".bright_green().to_string(),
        Some(g) if g.is_finite() => format!("{:.2}%", g).bright_yellow().to_string(),
        _ => "-".bright_black().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_absent_values_render_as_dash() {
        assert!(format_bound(None).contains('-'));
        assert!(format_bound(Some(f64::INFINITY)).contains('-'));
        assert!(format_gap(Some(f64::NAN)).contains('-'));
        assert!(format_gap(Some(12.5)).contains("12.50%"));
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("bnb_incumbent".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn test_backend_end_line() {
        let visitor = EventVisitor {
            event: Some("backend_end".to_string()),
            backend: Some("decomposition".to_string()),
            status: Some("optimal".to_string()),
            lower_bound: Some(12.0),
            upper_bound: Some(12.0),
            gap: Some(0.0),
            nodes: Some(1234),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor);
        assert!(line.contains("decomposition"));
        assert!(line.contains("12.00"));
        assert!(line.contains("1,234"));
    }
}
