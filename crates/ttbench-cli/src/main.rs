//! ttbench: run timetabling MILP benchmarks from the command line.
//!
//! ```bash
//! # Compare every built-in backend on two instances
//! ttbench run data/Brazil1.txt data/Brazil2.txt
//!
//! # Use a config file, override the time limit, print Markdown
//! ttbench run -c bench.toml --time-limit 60 --format markdown
//!
//! # Hand a model to an external MILP solver
//! ttbench export data/Brazil1.txt -o brazil1.lp
//! ```

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{BackendsCmd, ExportCmd, InspectCmd, RunCmd};

#[derive(Parser)]
#[command(
    name = "ttbench",
    version,
    about = "Benchmark MILP solver backends on school timetabling instances"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress the banner and progress log
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run instances against solver backends and print the results table
    Run(RunCmd),

    /// Write the assignment model of an instance in LP format
    Export(ExportCmd),

    /// Print instance sizes and model dimensions
    Inspect(InspectCmd),

    /// List registered solver backends
    Backends(BackendsCmd),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if !cli.quiet {
        ttbench::console::init();
    }

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Run(cmd) => cmd.execute(&mut stdout),
        Commands::Export(cmd) => cmd.execute(&mut stdout),
        Commands::Inspect(cmd) => cmd.execute(&mut stdout),
        Commands::Backends(cmd) => cmd.execute(&mut stdout),
    }
}
