//! Export command - write an instance's model in LP format

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ttbench::{write_lp, ModelBuilder, ObjectiveSense};

use super::load_instance;

#[derive(Parser, Debug)]
pub struct ExportCmd {
    /// Instance file
    pub instance: PathBuf,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Maximize the objective instead of minimizing it
    #[arg(long)]
    pub maximize: bool,
}

impl ExportCmd {
    pub fn execute(&self, out: &mut impl Write) -> Result<()> {
        let instance = load_instance(&self.instance)?;
        let sense = if self.maximize {
            ObjectiveSense::Maximize
        } else {
            ObjectiveSense::Minimize
        };
        let model = ModelBuilder::new(&instance)
            .with_sense(sense)
            .build()
            .with_context(|| format!("Failed to build model for {}", instance.name()))?;
        let lp = write_lp(&model);

        match &self.output {
            Some(path) => {
                std::fs::write(path, lp)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                writeln!(out, "Wrote {} to {}", model.name(), path.display())?;
            }
            None => out.write_all(lp.as_bytes())?,
        }
        Ok(())
    }
}
