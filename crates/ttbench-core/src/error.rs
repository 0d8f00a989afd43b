//! Error types for instance validation and model building

use thiserror::Error;

/// An instance violates one of its structural invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// An entity was given an empty identifier.
    #[error("{kind} identifier must not be empty")]
    EmptyId { kind: &'static str },

    #[error("duplicate time identifier '{0}'")]
    DuplicateTime(String),

    #[error("duplicate resource identifier '{0}'")]
    DuplicateResource(String),

    #[error("duplicate event identifier '{0}'")]
    DuplicateEvent(String),

    /// An event references a resource that does not exist.
    #[error("event '{event}' references unknown resource '{reference}'")]
    UnresolvedResource { event: String, reference: String },

    /// An event references a resource of the wrong kind.
    #[error("event '{event}' expects a {expected} resource but '{reference}' is a {found}")]
    WrongResourceKind {
        event: String,
        reference: String,
        expected: String,
        found: String,
    },

    #[error("event '{event}' has non-positive duration {duration}")]
    NonPositiveDuration { event: String, duration: i64 },
}

/// The model builder refused to produce a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("instance '{0}' has no events")]
    NoEvents(String),

    #[error("instance '{0}' has no times")]
    NoTimes(String),

    /// The cost function produced NaN or an infinity.
    #[error("cost for event '{event}' at time '{time}' is not finite ({cost})")]
    NonFiniteCost {
        event: String,
        time: String,
        cost: f64,
    },
}

/// Result type alias for instance validation
pub type Result<T> = std::result::Result<T, ValidationError>;
