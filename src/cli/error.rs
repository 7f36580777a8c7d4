//! CLI-level errors (wraps domain and settings errors)

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Settings(#[from] SettingsError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Domain(e) => match e {
                DomainError::Parse { .. } | DomainError::TooDeep { .. } => {
                    crate::exitcode::DATAERR
                }
                DomainError::InvalidNotation(_) => crate::exitcode::CONFIG,
                DomainError::InvalidNode(_) | DomainError::CycleDetected { .. } => {
                    crate::exitcode::SOFTWARE
                }
            },
            CliError::Settings(_) => crate::exitcode::CONFIG,
        }
    }
}
