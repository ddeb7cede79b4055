//! Error types for the simulation core.

use thiserror::Error;

/// Errors raised by the simulation core.
///
/// `InvalidArgument` is raised eagerly at configuration or construction time
/// and is fatal to startup. `InvariantViolation` indicates a bug in the core
/// itself; it is unreachable in correct operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl SimError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
