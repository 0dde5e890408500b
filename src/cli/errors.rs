//! CLI-specific error types
//!
//! Repository rejections are reported to the user and never abort the
//! interactive menu; everything else is fatal to the command.

use std::io;

use thiserror::Error;

use crate::errors::Severity;
use crate::record::RecordError;
use crate::repository::RepositoryError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "SCHOOL_CLI_CONFIG_ERROR",
            CliError::Io(_) | CliError::Json(_) => "SCHOOL_CLI_IO_ERROR",
            CliError::InvalidInput(_) => "SCHOOL_CLI_INVALID_INPUT",
            CliError::Repository(e) => e.code(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CliError::InvalidInput(_) => Severity::Reject,
            CliError::Repository(e) => e.severity(),
            _ => Severity::Error,
        }
    }

    /// Whether the user can correct the input and carry on
    pub fn is_rejection(&self) -> bool {
        self.severity() == Severity::Reject
    }
}

impl From<RecordError> for CliError {
    fn from(e: RecordError) -> Self {
        CliError::Repository(RepositoryError::Record(e))
    }
}
