//! Instance loaders for ttbench.
//!
//! The benchmark core only depends on the [`InstanceLoader`] contract: any
//! source format is acceptable as long as it yields a validated
//! [`Instance`]. [`XmlLoader`] reads XHSTT-style XML archives,
//! [`TextLoader`] the sectioned, comma-delimited format, and [`AutoLoader`]
//! picks one of them per file. The text format looks like:
//!
//! ```text
//! Times:
//! T1, Monday 1
//! T2, Monday 2
//! Resources:
//! R1, Class 1A, Class
//! R2, Alice, Teacher
//! Events:
//! E1, Maths, 1, R1, R2
//! ```
//!
//! # Example
//!
//! ```
//! use ttbench_loader::{InstanceLoader, TextLoader};
//!
//! let instance = TextLoader::new()
//!     .load_str("demo", "Times:\nT1, Mon\nResources:\nR1, 1A, Class\nR2, Bob, Teacher\nEvents:\nE1, Art, 1, R1, R2\n")
//!     .unwrap();
//! assert_eq!(instance.event_count(), 1);
//! ```

mod auto;
mod text;
mod xml;

use std::path::{Path, PathBuf};

use thiserror::Error;
use ttbench_core::{Instance, ValidationError};

pub use auto::{AutoLoader, InstanceFormat};
pub use text::TextLoader;
pub use xml::XmlLoader;

/// Loading error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed input, with a 1-based line number.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid instance: {0}")]
    Validation(#[from] ValidationError),
}

/// Produces a validated [`Instance`] from some source.
pub trait InstanceLoader {
    /// Parses `input`, naming the resulting instance `name`.
    fn load_str(&self, name: &str, input: &str) -> Result<Instance, LoadError>;

    /// Reads and parses a file. The instance is named after the file stem.
    fn load(&self, path: &Path) -> Result<Instance, LoadError> {
        let input = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&instance_name(path), &input)
    }
}

/// Returns the display name used for an instance file.
pub fn instance_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
