//! Backend failures.

use thiserror::Error;

/// A backend failed for one (instance, backend) pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The backend environment could not be started.
    #[error("{backend}: initialization failed: {message}")]
    Init { backend: String, message: String },

    /// Variables or constraints could not be registered with the backend.
    #[error("{backend}: model registration failed: {message}")]
    Build { backend: String, message: String },

    /// The optimize call itself failed.
    #[error("{backend}: optimization failed: {message}")]
    Optimize { backend: String, message: String },
}

impl SolverError {
    pub fn init(backend: impl Into<String>, message: impl Into<String>) -> Self {
        SolverError::Init {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn build(backend: impl Into<String>, message: impl Into<String>) -> Self {
        SolverError::Build {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn optimize(backend: impl Into<String>, message: impl Into<String>) -> Self {
        SolverError::Optimize {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn backend(&self) -> &str {
        match self {
            SolverError::Init { backend, .. }
            | SolverError::Build { backend, .. }
            | SolverError::Optimize { backend, .. } => backend,
        }
    }

    /// Short stage label: `init`, `build` or `optimize`.
    pub fn stage(&self) -> &'static str {
        match self {
            SolverError::Init { .. } => "init",
            SolverError::Build { .. } => "build",
            SolverError::Optimize { .. } => "optimize",
        }
    }
}
