//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::TriState;

/// Domain errors represent violations of the selection tree's rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot read hierarchy source {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("malformed hierarchy: {0}")]
    MalformedHierarchy(String),

    #[error("state {0:?} cannot be requested directly, it is derived from children")]
    InvalidStateRequest(TriState),

    #[error("node does not belong to this tree")]
    UnknownNode,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
