//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Io(_) => crate::exitcode::SOFTWARE,
            CliError::Application(e) => match e {
                ApplicationError::NodeNotFound(_) => crate::exitcode::USAGE,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Domain(d) => match d {
                    DomainError::SourceUnavailable { .. } => crate::exitcode::NOINPUT,
                    DomainError::MalformedHierarchy(_) => crate::exitcode::DATAERR,
                    DomainError::InvalidStateRequest(_) => crate::exitcode::USAGE,
                    DomainError::UnknownNode => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_unreadable_source_when_mapping_exit_code_then_noinput() {
        let err = CliError::from(ApplicationError::from(DomainError::SourceUnavailable {
            path: PathBuf::from("/nope"),
            reason: "missing".to_string(),
        }));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_unknown_path_when_mapping_exit_code_then_usage() {
        let err = CliError::from(ApplicationError::NodeNotFound("x/y".to_string()));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
