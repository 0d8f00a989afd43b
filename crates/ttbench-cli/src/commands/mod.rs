//! Subcommand implementations. Each writes its output to the given writer.

mod backends;
mod export;
mod inspect;
mod run;

use std::path::Path;

use anyhow::{Context, Result};
use ttbench::{AutoLoader, Instance, InstanceLoader};

pub use backends::BackendsCmd;
pub use export::ExportCmd;
pub use inspect::InspectCmd;
pub use run::RunCmd;

#[cfg(test)]
pub use run::OutputFormat;

fn load_instance(path: &Path) -> Result<Instance> {
    AutoLoader::new()
        .load(path)
        .with_context(|| format!("Failed to load instance {}", path.display()))
}
